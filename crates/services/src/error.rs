//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{OptionIndexError, SessionResultError};
use quiz_core::parser::AnswerKeyError;
use storage::repository::StorageError;

/// Errors emitted by `ImportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("no valid questions to save")]
    NoQuestions,
    #[error("no questions are stored yet; import questions first")]
    NoStoredQuestions,
    #[error("answer key has {} format errors; nothing was applied", .errors.len())]
    MalformedAnswerKey { errors: Vec<AnswerKeyError> },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session already completed")]
    Completed,
    #[error("current question already answered")]
    AlreadyAnswered,
    #[error(transparent)]
    InvalidOption(#[from] OptionIndexError),
    #[error(transparent)]
    Summary(#[from] SessionResultError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
