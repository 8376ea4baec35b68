use std::cmp::Reverse;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::engine::latency::round_to_millis;
use crate::session::quiz::{QuizSession, StopReason};

fn as_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

#[derive(Clone, Debug, Serialize)]
pub struct ItemReport {
    pub key: String,
    pub answer: String,
    pub total: usize,
    pub incorrect: usize,
    pub weight: f64,
    #[serde(rename = "p95_ms", serialize_with = "as_millis")]
    pub p95: Duration,
    #[serde(rename = "p50_ms", serialize_with = "as_millis")]
    pub p50: Duration,
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stop_reason: StopReason,
    pub answered: usize,
    pub correct: usize,
    pub score_percent: f64,
    #[serde(rename = "p95_ms", serialize_with = "as_millis")]
    pub p95: Duration,
    #[serde(rename = "p50_ms", serialize_with = "as_millis")]
    pub p50: Duration,
    /// Every answered item, slowest p95 first.
    pub items: Vec<ItemReport>,
    /// Up to `top` items with at least one miss, most missed first.
    pub missed: Vec<ItemReport>,
}

impl SessionReport {
    /// Snapshot of a session. `None` when nothing was answered.
    pub fn from_session(session: &QuizSession, stop_reason: StopReason, top: usize) -> Option<Self> {
        let answered = session.answered();
        if answered == 0 {
            return None;
        }
        let correct = session.correct();
        let latency = session.latency();

        let mut items: Vec<ItemReport> = session
            .vocab()
            .iter()
            .filter_map(|(key, answer)| {
                let tally = session.tally(key)?;
                Some(ItemReport {
                    key: key.to_string(),
                    answer: answer.to_string(),
                    total: tally.total,
                    incorrect: tally.incorrect,
                    weight: session.weight(key),
                    p95: round_to_millis(latency.key_percentile(key, 95.0)),
                    p50: round_to_millis(latency.key_percentile(key, 50.0)),
                })
            })
            .collect();
        items.sort_by_key(|row| Reverse(row.p95));

        let mut missed: Vec<ItemReport> =
            items.iter().filter(|row| row.incorrect > 0).cloned().collect();
        missed.sort_by_key(|row| (Reverse(row.incorrect), Reverse(row.p95)));
        missed.truncate(top);

        Some(Self {
            started_at: session.started_at(),
            finished_at: Utc::now(),
            stop_reason,
            answered,
            correct,
            score_percent: correct as f64 / answered as f64 * 100.0,
            p95: round_to_millis(latency.percentile(95.0)),
            p50: round_to_millis(latency.percentile(50.0)),
            items,
            missed,
        })
    }

    pub fn score_line(&self) -> String {
        format!(
            "Total score: {}/{} ({:.2}%)",
            self.correct, self.answered, self.score_percent
        )
    }

    pub fn times_line(&self) -> String {
        format!("Total times: p95 {:?}, p50: {:?}", self.p95, self.p50)
    }
}
