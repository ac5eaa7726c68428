use chrono::{DateTime, NaiveDate, Utc};

use quiz_core::model::{DailyStats, Outcome, ProgressMap, QuestionId};
use quiz_core::time::Clock;
use storage::repository::{Storage, StorageError};

/// Apply one observed outcome to the progress map and daily counters.
///
/// - `ToggleStar` flips the star flag, creating a default record if needed.
/// - `Correct`/`Wrong` count an attempt, stamp `last_seen_at` with `now`, and
///   bump the counters for `today`.
/// - `None` changes nothing.
pub fn apply_outcome(
    progress: &mut ProgressMap,
    stats: &mut DailyStats,
    id: &QuestionId,
    outcome: Outcome,
    now: DateTime<Utc>,
    today: NaiveDate,
) {
    match outcome {
        Outcome::None => {}
        Outcome::ToggleStar => progress.entry(id.clone()).or_default().toggle_star(),
        Outcome::Correct | Outcome::Wrong => {
            progress
                .entry(id.clone())
                .or_default()
                .record_attempt(outcome, now);
            stats
                .entry(today)
                .or_default()
                .record(outcome == Outcome::Correct);
        }
    }
}
/// Persists ledger updates: read the full map, apply one change, write it back.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    storage: Storage,
}
impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage) -> Self {
        Self { clock, storage }
    }
    /// Record `outcome` for `id` and return the updated progress map.
    ///
    /// Daily stats are only read and written for graded outcomes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the blobs cannot be read or written.
    pub async fn record(
        &self,
        id: &QuestionId,
        outcome: Outcome,
    ) -> Result<ProgressMap, StorageError> {
        let mut progress = self.storage.progress().await?;
        match outcome {
            Outcome::None => return Ok(progress),
            Outcome::ToggleStar => {
                let mut untouched = DailyStats::new();
                apply_outcome(
                    &mut progress,
                    &mut untouched,
                    id,
                    outcome,
                    self.clock.now(),
                    self.clock.today(),
                );
            }
            Outcome::Correct | Outcome::Wrong => {
                let mut stats = self.storage.daily_stats().await?;
                apply_outcome(
                    &mut progress,
                    &mut stats,
                    id,
                    outcome,
                    self.clock.now(),
                    self.clock.today(),
                );
                self.storage.save_daily_stats(&stats).await?;
            }
        }

        self.storage.save_progress(&progress).await?;
        log::debug!("recorded {outcome:?} for question {id}");
        Ok(progress)
    }

    /// Flip the star flag for `id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the progress blob cannot be read or written.
    pub async fn toggle_star(&self, id: &QuestionId) -> Result<ProgressMap, StorageError> {
        self.record(id, Outcome::ToggleStar).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{DailyStat, LastResult, Progress};
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::repository::KeyValueStore;

    fn id(value: &str) -> QuestionId {
        QuestionId::new(value)
    }

    #[test]
    fn toggle_star_twice_restores_record() {
        let mut progress = ProgressMap::new();
        let mut stats = DailyStats::new();
        let original = Progress {
            attempts: 3,
            correct_attempts: 2,
            last_result: LastResult::Correct,
            starred: false,
            last_seen_at: 99,
        };
        progress.insert(id("1"), original.clone());
        let today = fixed_clock().today();

        apply_outcome(
            &mut progress,
            &mut stats,
            &id("1"),
            Outcome::ToggleStar,
            fixed_now(),
            today,
        );
        assert!(progress[&id("1")].starred);
        apply_outcome(
            &mut progress,
            &mut stats,
            &id("1"),
            Outcome::ToggleStar,
            fixed_now(),
            today,
        );

        assert_eq!(progress[&id("1")], original);
        assert!(stats.is_empty());
    }

    #[test]
    fn toggle_star_creates_default_record() {
        let mut progress = ProgressMap::new();
        let mut stats = DailyStats::new();
        apply_outcome(
            &mut progress,
            &mut stats,
            &id("9"),
            Outcome::ToggleStar,
            fixed_now(),
            fixed_clock().today(),
        );

        let record = &progress[&id("9")];
        assert!(record.starred);
        assert_eq!(record.attempts, 0);
        assert_eq!(record.last_seen_at, 0);
    }

    #[test]
    fn daily_stats_accumulate_within_a_day() {
        let mut progress = ProgressMap::new();
        let mut stats = DailyStats::new();
        let today = fixed_clock().today();

        for _ in 0..3 {
            apply_outcome(
                &mut progress,
                &mut stats,
                &id("1"),
                Outcome::Correct,
                fixed_now(),
                today,
            );
        }
        assert_eq!(stats[&today], DailyStat { answered: 3, correct: 3 });

        apply_outcome(
            &mut progress,
            &mut stats,
            &id("2"),
            Outcome::Wrong,
            fixed_now(),
            today,
        );
        assert_eq!(stats[&today], DailyStat { answered: 4, correct: 3 });

        let first = &progress[&id("1")];
        assert_eq!(first.attempts, 3);
        assert_eq!(first.correct_attempts, 3);
        assert_eq!(first.last_seen_at, fixed_now().timestamp_millis());
        assert_eq!(progress[&id("2")].last_result, LastResult::Wrong);
    }

    #[test]
    fn none_outcome_is_a_no_op() {
        let mut progress = ProgressMap::new();
        let mut stats = DailyStats::new();
        apply_outcome(
            &mut progress,
            &mut stats,
            &id("1"),
            Outcome::None,
            fixed_now(),
            fixed_clock().today(),
        );
        assert!(progress.is_empty());
        assert!(stats.is_empty());
    }

    #[tokio::test]
    async fn service_persists_progress_and_stats() {
        let storage = Storage::in_memory();
        let service = ProgressService::new(fixed_clock(), storage.clone());

        let returned = service.record(&id("4"), Outcome::Correct).await.unwrap();
        service.record(&id("4"), Outcome::Wrong).await.unwrap();
        service.toggle_star(&id("4")).await.unwrap();

        assert_eq!(returned[&id("4")].attempts, 1);
        let stored = storage.progress().await.unwrap();
        assert_eq!(stored[&id("4")].attempts, 2);
        assert!(stored[&id("4")].starred);

        let stats = storage.daily_stats().await.unwrap();
        assert_eq!(
            stats[&fixed_clock().today()],
            DailyStat { answered: 2, correct: 1 }
        );
    }

    #[tokio::test]
    async fn service_skips_writes_for_none() {
        let storage = Storage::in_memory();
        let service = ProgressService::new(fixed_clock(), storage.clone());
        service.record(&id("1"), Outcome::None).await.unwrap();

        assert!(storage.kv.get("rl_v2_progress").await.unwrap().is_none());
        assert!(storage.kv.get("rl_v2_stats").await.unwrap().is_none());
    }
}
