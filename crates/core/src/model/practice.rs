use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which questions a practice session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PracticeMode {
    All,
    Starred,
    Wrong,
    /// Currently the same selection as `All`.
    #[default]
    Smart,
    Range,
}

/// Parameters for a range-mode session.
///
/// `start` and `end` are inclusive bounds on `Question::number`. An inverted
/// range is allowed and simply selects nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeRange {
    start: u32,
    end: u32,
    #[serde(default)]
    shuffle: bool,
    #[serde(default)]
    shuffle_options: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_limit: Option<u32>,
}

impl PracticeRange {
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end,
            shuffle: false,
            shuffle_options: false,
            limit: None,
            time_limit: None,
        }
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn with_shuffle_options(mut self, shuffle_options: bool) -> Self {
        self.shuffle_options = shuffle_options;
        self
    }

    /// Cap on the number of questions. Zero means no cap.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Countdown length in minutes. Zero means untimed.
    #[must_use]
    pub fn with_time_limit_minutes(mut self, minutes: u32) -> Self {
        self.time_limit = (minutes > 0).then_some(minutes);
        self
    }

    #[must_use]
    pub fn start(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> u32 {
        self.end
    }

    #[must_use]
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    #[must_use]
    pub fn shuffle_options(&self) -> bool {
        self.shuffle_options
    }

    #[must_use]
    pub fn limit(&self) -> Option<u32> {
        self.limit.filter(|limit| *limit > 0)
    }

    #[must_use]
    pub fn time_limit_minutes(&self) -> Option<u32> {
        self.time_limit.filter(|minutes| *minutes > 0)
    }

    /// Countdown derived from the time limit (`minutes * 60` seconds).
    #[must_use]
    pub fn countdown(&self) -> Option<Duration> {
        self.time_limit_minutes()
            .map(|minutes| Duration::from_secs(u64::from(minutes) * 60))
    }

    #[must_use]
    pub fn contains(&self, number: u32) -> bool {
        (self.start..=self.end).contains(&number)
    }
}
