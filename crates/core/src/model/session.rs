use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::stats::percent;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionResultError {
    #[error("answered count ({answered}) exceeds session size ({total})")]
    CountMismatch { answered: u32, total: u32 },
}

/// Tally of a finished practice session, reported to the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    correct: u32,
    wrong: u32,
    unkeyed: u32,
    total: u32,
    /// Seconds.
    time_spent: u32,
    #[serde(default)]
    timed_out: bool,
}

impl SessionResult {
    /// Build a result from session counters.
    ///
    /// # Errors
    ///
    /// Returns `SessionResultError::CountMismatch` if more questions were
    /// answered than the session contained.
    pub fn new(
        correct: u32,
        wrong: u32,
        unkeyed: u32,
        total: u32,
        time_spent: u32,
    ) -> Result<Self, SessionResultError> {
        let answered = correct.saturating_add(wrong).saturating_add(unkeyed);
        if answered > total {
            return Err(SessionResultError::CountMismatch { answered, total });
        }

        Ok(Self {
            correct,
            wrong,
            unkeyed,
            total,
            time_spent,
            timed_out: false,
        })
    }

    #[must_use]
    pub fn with_timed_out(mut self, timed_out: bool) -> Self {
        self.timed_out = timed_out;
        self
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    #[must_use]
    pub fn unkeyed(&self) -> u32 {
        self.unkeyed
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn time_spent(&self) -> u32 {
        self.time_spent
    }

    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Questions in the session that were never answered.
    #[must_use]
    pub fn skipped(&self) -> u32 {
        self.total
            .saturating_sub(self.correct + self.wrong + self.unkeyed)
    }

    /// Correct answers as a percentage of gradable questions.
    ///
    /// Unkeyed questions are excluded from the denominator, which never drops
    /// below one.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let gradable = self.total.saturating_sub(self.unkeyed).max(1);
        percent(self.correct, gradable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_rejects_more_answers_than_questions() {
        let err = SessionResult::new(3, 2, 1, 5, 10).unwrap_err();
        assert_eq!(err, SessionResultError::CountMismatch { answered: 6, total: 5 });
    }

    #[test]
    fn accuracy_excludes_unkeyed_questions() {
        let result = SessionResult::new(3, 1, 6, 10, 42).unwrap();
        assert_eq!(result.accuracy_percent(), 75);
        assert_eq!(result.skipped(), 0);
    }

    #[test]
    fn accuracy_of_all_unkeyed_session_is_zero() {
        let result = SessionResult::new(0, 0, 4, 4, 5).unwrap();
        assert_eq!(result.accuracy_percent(), 0);
    }

    #[test]
    fn skipped_counts_unanswered() {
        let result = SessionResult::new(1, 1, 0, 5, 60)
            .unwrap()
            .with_timed_out(true);
        assert_eq!(result.skipped(), 3);
        assert!(result.timed_out());
    }
}
