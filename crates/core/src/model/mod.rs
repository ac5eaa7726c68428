mod ids;
mod practice;
mod progress;
mod question;
mod session;
mod stats;

pub use ids::{OptionIndex, OptionIndexError, QuestionId};

pub use practice::{PracticeMode, PracticeRange};
pub use progress::{LastResult, Outcome, Progress, ProgressMap};
pub use question::{Question, QuestionError};
pub use session::{SessionResult, SessionResultError};
pub use stats::{DailyStat, DailyStats, percent};
