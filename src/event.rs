use std::future::Future;
use std::io;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;

use crate::error::QuizError;
use crate::session::quiz::StopReason;

pub type QuizWorker = JoinHandle<std::result::Result<StopReason, QuizError>>;

pub enum SessionEvent {
    /// The quiz loop returned on its own.
    Finished(StopReason),
    /// The interrupt source fired first.
    Interrupted,
}

/// Wait for whichever comes first: the worker finishing or the interrupt.
/// A worker error or panic is returned as a fatal error.
pub async fn next_event<F>(worker: &mut QuizWorker, interrupt: F) -> Result<SessionEvent>
where
    F: Future<Output = io::Result<()>>,
{
    tokio::select! {
        joined = worker => {
            let reason = joined.context("quiz worker panicked")??;
            Ok(SessionEvent::Finished(reason))
        }
        signal = interrupt => {
            signal.context("listening for interrupt")?;
            Ok(SessionEvent::Interrupted)
        }
    }
}
