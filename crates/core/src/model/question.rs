use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OptionIndex, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("option {letter}) cannot be empty")]
    EmptyOption { letter: char },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One multiple-choice item with exactly four lettered options.
///
/// `correct_index` stays `None` until an answer key is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub number: u32,
    pub prompt: String,
    pub options: [String; 4],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<OptionIndex>,
}

impl Question {
    /// Create an unkeyed question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyOption` if any option is blank after trimming.
    pub fn new(
        id: QuestionId,
        number: u32,
        prompt: impl Into<String>,
        options: [String; 4],
    ) -> Result<Self, QuestionError> {
        for index in OptionIndex::all() {
            if options[index.value()].trim().is_empty() {
                return Err(QuestionError::EmptyOption {
                    letter: index.letter(),
                });
            }
        }

        Ok(Self {
            id,
            number,
            prompt: prompt.into(),
            options,
            correct_index: None,
        })
    }

    #[must_use]
    pub fn with_correct_index(mut self, index: OptionIndex) -> Self {
        self.correct_index = Some(index);
        self
    }

    #[must_use]
    pub fn is_keyed(&self) -> bool {
        self.correct_index.is_some()
    }

    #[must_use]
    pub fn option(&self, index: OptionIndex) -> &str {
        &self.options[index.value()]
    }

    /// Text of the correct option, if the question is keyed.
    #[must_use]
    pub fn correct_option(&self) -> Option<&str> {
        self.correct_index.map(|index| self.option(index))
    }
}
