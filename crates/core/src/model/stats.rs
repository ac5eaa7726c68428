use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Daily counters keyed by local calendar date (`YYYY-MM-DD` when serialized).
pub type DailyStats = BTreeMap<NaiveDate, DailyStat>;

/// Answered/correct counters for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyStat {
    pub answered: u32,
    pub correct: u32,
}

impl DailyStat {
    pub fn record(&mut self, is_correct: bool) {
        self.answered = self.answered.saturating_add(1);
        if is_correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    /// Rounded accuracy in percent, 0 when nothing was answered.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        percent(self.correct, self.answered)
    }
}

/// `round(part * 100 / whole)`, or 0 for an empty whole.
#[must_use]
pub fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let scaled = u64::from(part) * 100;
    let whole = u64::from(whole);
    u32::try_from((scaled + whole / 2) / whole).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_answers() {
        let mut stat = DailyStat::default();
        stat.record(true);
        stat.record(false);
        stat.record(true);
        assert_eq!(stat, DailyStat { answered: 3, correct: 2 });
        assert_eq!(stat.accuracy_percent(), 67);
    }

    #[test]
    fn percent_handles_empty_whole() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(1, 3), 33);
    }

    #[test]
    fn stats_serialize_with_iso_date_keys() {
        let mut stats = DailyStats::new();
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        stats.insert(day, DailyStat { answered: 2, correct: 1 });

        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"2024-03-09":{"answered":2,"correct":1}}"#);
    }
}
