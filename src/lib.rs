//! Adaptive kana drill: weighted item selection with an anti-repeat window,
//! and response-time percentiles reported at the end of a session.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod session;
pub mod ui;
pub mod vocab;
