use std::collections::HashMap;
use std::time::Duration;

/// Append-only response-time samples, kept globally and per item.
#[derive(Clone, Debug, Default)]
pub struct LatencyRecorder {
    overall: Vec<Duration>,
    per_key: HashMap<String, Vec<Duration>>,
}

impl LatencyRecorder {
    pub fn record(&mut self, key: &str, elapsed: Duration) {
        self.overall.push(elapsed);
        self.per_key.entry(key.to_string()).or_default().push(elapsed);
    }

    pub fn overall(&self) -> &[Duration] {
        &self.overall
    }

    pub fn for_key(&self, key: &str) -> &[Duration] {
        self.per_key.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn percentile(&self, p: f64) -> Duration {
        percentile(&self.overall, p)
    }

    pub fn key_percentile(&self, key: &str, p: f64) -> Duration {
        percentile(self.for_key(key), p)
    }
}

/// Rank-based percentile over an unsorted sample set, `p` in `[0, 100)`.
///
/// With `idx = p / 100 * len` over the sorted samples: an integral `idx`
/// averages the elements at `idx - 1` and `idx`, otherwise the element at
/// `round(idx) - 1` is returned. `idx < 1` yields a zero duration, as does
/// an empty sample set.
pub fn percentile(samples: &[Duration], p: f64) -> Duration {
    if samples.is_empty() {
        return Duration::ZERO;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();
    percentile_sorted(&sorted, p)
}

fn percentile_sorted(sorted: &[Duration], p: f64) -> Duration {
    let idx = (p / 100.0) * sorted.len() as f64;
    if !idx.is_finite() {
        return Duration::ZERO;
    }

    let rank = round_half_up(idx);
    if rank < 1 {
        return Duration::ZERO;
    }
    let last = sorted.len() - 1;

    if idx.fract() == 0.0 {
        let lower = sorted[(rank - 1).min(last)];
        let upper = sorted[rank.min(last)];
        return (lower + upper) / 2;
    }
    sorted[(rank - 1).min(last)]
}

fn round_half_up(value: f64) -> usize {
    if value <= 0.0 {
        return 0;
    }
    (value + 0.5).floor() as usize
}

/// Round to whole milliseconds, half away from zero.
pub fn round_to_millis(d: Duration) -> Duration {
    let nanos = d.as_nanos();
    let millis = (nanos + 500_000) / 1_000_000;
    Duration::from_millis(millis as u64)
}
