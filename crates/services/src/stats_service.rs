use chrono::NaiveDate;

use quiz_core::Clock;
use quiz_core::model::DailyStat;
use storage::repository::{Storage, StorageError};

/// Headline numbers for the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardSummary {
    pub total_questions: usize,
    pub keyed_questions: usize,
    pub starred: usize,
    pub wrong: usize,
    pub today: DailyStat,
    pub today_accuracy_percent: u32,
}

/// Read-only aggregates over the stored blobs.
#[derive(Clone)]
pub struct StatsService {
    clock: Clock,
    storage: Storage,
}

impl StatsService {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage) -> Self {
        Self { clock, storage }
    }

    /// Counts for the question bank plus today's tally.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any blob cannot be read.
    pub async fn dashboard(&self) -> Result<DashboardSummary, StorageError> {
        let questions = self.storage.questions().await?;
        let progress = self.storage.progress().await?;
        let stats = self.storage.daily_stats().await?;

        let today = stats
            .get(&self.clock.today())
            .copied()
            .unwrap_or_default();

        Ok(DashboardSummary {
            total_questions: questions.len(),
            keyed_questions: questions.iter().filter(|q| q.is_keyed()).count(),
            starred: progress.values().filter(|p| p.starred).count(),
            wrong: progress.values().filter(|p| p.is_wrong()).count(),
            today,
            today_accuracy_percent: today.accuracy_percent(),
        })
    }

    /// The most recent `days` recorded days, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the stats blob cannot be read.
    pub async fn history(&self, days: usize) -> Result<Vec<(NaiveDate, DailyStat)>, StorageError> {
        let stats = self.storage.daily_stats().await?;
        Ok(stats
            .into_iter()
            .rev()
            .take(days)
            .collect())
    }
}
