use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::engine::{LatencyRecorder, RepeatGuard, WeightPolicy, WeightStore, WeightedSampler};
use crate::error::{QuizError, Result};
use crate::session::input::{self, Answer};
use crate::vocab::{Item, Vocabulary};

/// Prompt/response collaborator driven by the quiz loop.
pub trait Console {
    /// Show `question` and read one line. `Ok(None)` means input is closed.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;

    fn show_outcome(&mut self, outcome: &Outcome) -> io::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Quit,
    EndOfInput,
    Interrupted,
}

/// Result of scoring one answer, with the running totals after it.
#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub item: Item,
    pub correct: bool,
    pub answered: usize,
    pub correct_total: usize,
    pub weight: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemTally {
    pub total: usize,
    pub incorrect: usize,
}

/// All mutable state of one drill session.
pub struct QuizSession {
    vocab: Vocabulary,
    weights: WeightStore,
    guard: RepeatGuard,
    latency: LatencyRecorder,
    tallies: HashMap<String, ItemTally>,
    answered: usize,
    correct: usize,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn new(vocab: Vocabulary, policy: WeightPolicy, history_size: usize) -> Result<Self> {
        if vocab.is_empty() {
            return Err(QuizError::EmptyItemSet);
        }
        let weights = WeightStore::new(vocab.keys(), policy);
        let guard = RepeatGuard::for_item_count(vocab.len(), history_size);
        info!(
            vocabulary = vocab.name(),
            items = vocab.len(),
            window = guard.capacity(),
            policy = ?policy,
            "session started"
        );
        Ok(Self {
            vocab,
            weights,
            guard,
            latency: LatencyRecorder::default(),
            tallies: HashMap::new(),
            answered: 0,
            correct: 0,
            started_at: Utc::now(),
        })
    }

    /// Draw the next item, re-drawing while the key is inside the repeat
    /// window, and remember it in the window.
    pub fn next_item<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Item> {
        let sampler = WeightedSampler::new(self.vocab.keys(), &self.weights)?;
        let key = loop {
            let key = sampler.draw(rng);
            if self.guard.should_skip(key) {
                debug!(key, "rejected recent item");
                continue;
            }
            break key;
        };
        self.guard.record(key);
        self.vocab.item(key).ok_or(QuizError::EmptyItemSet)
    }

    pub fn score(&mut self, item: &Item, response: &str, elapsed: Duration) -> Outcome {
        let correct = input::is_match(response, &item.answer);
        let tally = self.tallies.entry(item.key.clone()).or_default();
        tally.total += 1;
        self.answered += 1;

        if correct {
            self.correct += 1;
            self.weights.decrease(&item.key);
        } else {
            tally.incorrect += 1;
            self.weights.increase(&item.key);
        }
        self.latency.record(&item.key, elapsed);

        Outcome {
            item: item.clone(),
            correct,
            answered: self.answered,
            correct_total: self.correct,
            weight: self.weight(&item.key),
        }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn answered(&self) -> usize {
        self.answered
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn weight(&self, key: &str) -> f64 {
        self.weights.get(key).unwrap_or_default()
    }

    pub fn tally(&self, key: &str) -> Option<ItemTally> {
        self.tallies.get(key).copied()
    }

    pub fn latency(&self) -> &LatencyRecorder {
        &self.latency
    }

    pub fn window_capacity(&self) -> usize {
        self.guard.capacity()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

pub type SharedSession = Arc<Mutex<QuizSession>>;

/// Lock the session for a read or an update. A panicked holder leaves the
/// counters consistent, so a poisoned lock is still readable.
pub fn lock_session(session: &Mutex<QuizSession>) -> MutexGuard<'_, QuizSession> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub enum QuizState {
    AwaitingItem,
    Prompting {
        item: Item,
        started: Instant,
    },
    Scoring {
        item: Item,
        response: String,
        elapsed: Duration,
    },
    Terminating(StopReason),
}

pub struct QuizLoop<C, R> {
    session: SharedSession,
    console: C,
    rng: R,
    shutdown: CancellationToken,
}

impl<C: Console, R: Rng> QuizLoop<C, R> {
    pub fn new(session: SharedSession, console: C, rng: R, shutdown: CancellationToken) -> Self {
        Self {
            session,
            console,
            rng,
            shutdown,
        }
    }

    pub fn run(mut self) -> Result<StopReason> {
        let mut state = QuizState::AwaitingItem;
        loop {
            state = match self.step(state)? {
                QuizState::Terminating(reason) => {
                    info!(?reason, "quiz loop stopped");
                    return Ok(reason);
                }
                next => next,
            };
        }
    }

    pub fn step(&mut self, state: QuizState) -> Result<QuizState> {
        match state {
            QuizState::AwaitingItem => {
                if self.shutdown.is_cancelled() {
                    return Ok(QuizState::Terminating(StopReason::Interrupted));
                }
                let item = lock_session(&self.session).next_item(&mut self.rng)?;
                Ok(QuizState::Prompting {
                    item,
                    started: Instant::now(),
                })
            }
            QuizState::Prompting { item, started } => {
                let line = self.console.ask(&item.key)?;
                let elapsed = started.elapsed();
                if self.shutdown.is_cancelled() {
                    return Ok(QuizState::Terminating(StopReason::Interrupted));
                }
                let Some(raw) = line else {
                    return Ok(QuizState::Terminating(StopReason::EndOfInput));
                };
                match input::classify(&raw) {
                    Answer::Quit => Ok(QuizState::Terminating(StopReason::Quit)),
                    Answer::Response(response) => Ok(QuizState::Scoring {
                        item,
                        response,
                        elapsed,
                    }),
                }
            }
            QuizState::Scoring {
                item,
                response,
                elapsed,
            } => {
                let outcome = lock_session(&self.session).score(&item, &response, elapsed);
                self.console.show_outcome(&outcome)?;
                Ok(QuizState::AwaitingItem)
            }
            QuizState::Terminating(reason) => Ok(QuizState::Terminating(reason)),
        }
    }
}
