#![forbid(unsafe_code)]

pub mod error;
pub mod import_service;
pub mod ledger;
pub mod sessions;
pub mod settings;
pub mod stats_service;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{ImportError, SessionError};
pub use import_service::{AnswerKeyApplied, ImportService};
pub use ledger::{ProgressService, apply_outcome};
pub use settings::{DEFAULT_ANSWER_KEY_ERROR_THRESHOLD, ImportSettings, SessionSettings};
pub use stats_service::{DashboardSummary, StatsService};

pub use sessions::{
    AnswerFeedback, PracticeSession, SessionBuilder, SessionLoopService, SessionPlan,
    SessionProgress, SessionQuestion, TimerEvent, TimerKind, TimerOutcome, TimerScheduler,
};
