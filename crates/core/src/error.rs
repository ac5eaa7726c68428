use thiserror::Error;

use crate::model::{OptionIndexError, QuestionError, SessionResultError};
use crate::parser::{AnswerKeyError, QuestionParseError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    OptionIndex(#[from] OptionIndexError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    QuestionParse(#[from] QuestionParseError),
    #[error(transparent)]
    AnswerKey(#[from] AnswerKeyError),
    #[error(transparent)]
    SessionResult(#[from] SessionResultError),
}
