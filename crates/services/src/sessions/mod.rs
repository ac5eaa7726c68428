mod plan;
mod progress;
mod service;
pub mod timers;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionBuilder, SessionPlan, SessionQuestion};
pub use progress::SessionProgress;
pub use service::{AnswerFeedback, PracticeSession, TimerOutcome};
pub use timers::{SessionTimers, TimerEvent, TimerHandle, TimerKind, TimerScheduler, TimerToken};
pub use workflow::SessionLoopService;
