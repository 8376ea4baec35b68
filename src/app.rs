use std::future::Future;
use std::io;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::error::QuizError;
use crate::event::{self, SessionEvent};
use crate::session::quiz::{Console, QuizLoop, QuizSession, SharedSession, StopReason, lock_session};
use crate::session::result::SessionReport;
use crate::vocab::Vocabulary;

pub const BUILTIN_KATAKANA: &str = "katakana";
pub const BUILTIN_HIRAGANA: &str = "hiragana";

/// Merge the enabled built-in tables and any vocabulary files, then apply
/// the item-count limit.
pub fn build_vocabulary<R: Rng + ?Sized>(
    config: &Config,
    rng: &mut R,
) -> std::result::Result<Vocabulary, QuizError> {
    let mut sets = Vec::new();
    if config.katakana {
        sets.push(Vocabulary::builtin(BUILTIN_KATAKANA)?);
    }
    if config.hiragana {
        sets.push(Vocabulary::builtin(BUILTIN_HIRAGANA)?);
    }
    for path in &config.vocab_files {
        sets.push(Vocabulary::from_path(path)?);
    }
    Ok(Vocabulary::merge(sets).limit(config.limit, rng))
}

pub struct Finished {
    pub reason: StopReason,
    pub report: Option<SessionReport>,
}

pub struct App {
    pub config: Config,
    session: SharedSession,
    rng: SmallRng,
    shutdown: CancellationToken,
}

impl App {
    pub fn new(config: Config, seed: Option<u64>) -> std::result::Result<Self, QuizError> {
        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let vocab = build_vocabulary(&config, &mut rng)?;
        let session = QuizSession::new(vocab, config.weights, config.history_size)?;
        Ok(Self {
            config,
            session: Arc::new(Mutex::new(session)),
            rng,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn session(&self) -> SharedSession {
        Arc::clone(&self.session)
    }

    /// Run the quiz on a blocking worker until it stops or `interrupt`
    /// resolves, then take one snapshot of the session for the report.
    pub async fn run<C, F>(self, console: C, interrupt: F) -> Result<Finished>
    where
        C: Console + Send + 'static,
        F: Future<Output = io::Result<()>>,
    {
        let session = Arc::clone(&self.session);
        let shutdown = self.shutdown.clone();
        let rng = self.rng;
        let mut worker = tokio::task::spawn_blocking(move || {
            QuizLoop::new(session, console, rng, shutdown).run()
        });

        let reason = match event::next_event(&mut worker, interrupt).await? {
            SessionEvent::Finished(reason) => reason,
            SessionEvent::Interrupted => {
                self.shutdown.cancel();
                StopReason::Interrupted
            }
        };
        info!(?reason, "session finished");

        let report =
            SessionReport::from_session(&lock_session(&self.session), reason, self.config.report_top);
        Ok(Finished { reason, report })
    }
}
