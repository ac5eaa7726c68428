use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ids::QuestionId;

/// Progress records keyed by question id.
pub type ProgressMap = HashMap<QuestionId, Progress>;

/// Result of the most recent graded attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastResult {
    Correct,
    Wrong,
    #[default]
    None,
}

/// An observed event for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Correct,
    Wrong,
    /// Answered, but the question has no key to grade against.
    None,
    ToggleStar,
}

impl Outcome {
    /// Outcome for a graded answer.
    #[must_use]
    pub fn graded(is_correct: bool) -> Self {
        if is_correct { Self::Correct } else { Self::Wrong }
    }

    /// True for outcomes that count as an attempt.
    #[must_use]
    pub fn is_graded(self) -> bool {
        matches!(self, Self::Correct | Self::Wrong)
    }
}

/// Per-question attempt history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub attempts: u32,
    pub correct_attempts: u32,
    pub last_result: LastResult,
    pub starred: bool,
    /// Epoch millis of the last graded attempt, 0 if never seen.
    pub last_seen_at: i64,
}

impl Progress {
    pub fn toggle_star(&mut self) {
        self.starred = !self.starred;
    }

    /// Record a graded attempt. Ungraded outcomes leave the record untouched.
    pub fn record_attempt(&mut self, outcome: Outcome, now: DateTime<Utc>) {
        let result = match outcome {
            Outcome::Correct => LastResult::Correct,
            Outcome::Wrong => LastResult::Wrong,
            Outcome::None | Outcome::ToggleStar => return,
        };

        self.attempts = self.attempts.saturating_add(1);
        if result == LastResult::Correct {
            self.correct_attempts = self.correct_attempts.saturating_add(1);
        }
        self.last_result = result;
        self.last_seen_at = now.timestamp_millis();
    }

    #[must_use]
    pub fn is_wrong(&self) -> bool {
        self.last_result == LastResult::Wrong
    }
}
