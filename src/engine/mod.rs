pub mod latency;
pub mod repeat_guard;
pub mod sampler;
pub mod weights;

pub use latency::LatencyRecorder;
pub use repeat_guard::RepeatGuard;
pub use sampler::WeightedSampler;
pub use weights::{WeightPolicy, WeightStore};
