use std::time::Duration;

/// Answer keys with more format errors than this are refused as a whole.
pub const DEFAULT_ANSWER_KEY_ERROR_THRESHOLD: usize = 5;

/// Knobs for `ImportService`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSettings {
    pub answer_key_error_threshold: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            answer_key_error_threshold: DEFAULT_ANSWER_KEY_ERROR_THRESHOLD,
        }
    }
}

/// Timer settings for a running practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Delay between recording an answer and moving to the next question.
    pub auto_advance_delay: Duration,
    /// Countdown resolution.
    pub tick_period: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            auto_advance_delay: Duration::from_secs(2),
            tick_period: Duration::from_secs(1),
        }
    }
}
