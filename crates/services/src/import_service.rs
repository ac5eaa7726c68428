use quiz_core::model::{OptionIndex, Question};
use quiz_core::parser::{
    AnswerKeyError, QuestionParseReport, parse_answer_key, parse_questions,
};
use storage::repository::Storage;

use crate::error::ImportError;
use crate::settings::ImportSettings;

/// Outcome of applying an answer key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKeyApplied {
    /// Stored questions that received a correct index.
    pub updated: usize,
    /// Lines that were skipped (count stayed within the threshold).
    pub errors: Vec<AnswerKeyError>,
}

/// Import flows: pasted questions, answer keys, bulk answers and reset.
#[derive(Clone)]
pub struct ImportService {
    storage: Storage,
    settings: ImportSettings,
}

impl ImportService {
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            settings: ImportSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: ImportSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Parse pasted text without storing anything.
    #[must_use]
    pub fn preview_questions(&self, text: &str) -> QuestionParseReport {
        let report = parse_questions(text);
        log::info!(
            "parsed {} questions, rejected {}",
            report.questions.len(),
            report.errors.len()
        );
        report
    }

    /// Replace the stored question set.
    ///
    /// Progress records are keyed by question id and are kept as they are.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::NoQuestions` for an empty list, or a storage error.
    pub async fn save_questions(&self, questions: &[Question]) -> Result<usize, ImportError> {
        if questions.is_empty() {
            return Err(ImportError::NoQuestions);
        }
        self.storage.save_questions(questions).await?;
        log::info!("saved {} questions", questions.len());
        Ok(questions.len())
    }

    /// Parse an answer key and patch `correct_index` on matching questions.
    ///
    /// The key is applied all-or-nothing: when the number of malformed lines
    /// exceeds the configured threshold on non-blank input, nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::MalformedAnswerKey` when the key is refused,
    /// `ImportError::NoStoredQuestions` when there is nothing to key, or a
    /// storage error.
    pub async fn apply_answer_key(&self, text: &str) -> Result<AnswerKeyApplied, ImportError> {
        let report = parse_answer_key(text);
        if report.errors.len() > self.settings.answer_key_error_threshold
            && !text.trim().is_empty()
        {
            log::warn!(
                "refusing answer key with {} malformed lines",
                report.errors.len()
            );
            return Err(ImportError::MalformedAnswerKey {
                errors: report.errors,
            });
        }

        let mut questions = self.storage.questions().await?;
        if questions.is_empty() {
            return Err(ImportError::NoStoredQuestions);
        }

        let mut updated = 0;
        for question in &mut questions {
            if let Some(index) = report.get(&question.id) {
                question.correct_index = Some(index);
                updated += 1;
            }
        }

        self.storage.save_questions(&questions).await?;
        log::info!("answer key applied to {updated} questions");
        Ok(AnswerKeyApplied {
            updated,
            errors: report.errors,
        })
    }

    /// Mark the same option as correct for every stored question.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::NoStoredQuestions` or a storage error.
    pub async fn apply_uniform_answer(&self, index: OptionIndex) -> Result<usize, ImportError> {
        let mut questions = self.storage.questions().await?;
        if questions.is_empty() {
            return Err(ImportError::NoStoredQuestions);
        }
        for question in &mut questions {
            question.correct_index = Some(index);
        }
        self.storage.save_questions(&questions).await?;
        log::info!("marked option {index} correct for {} questions", questions.len());
        Ok(questions.len())
    }

    /// Remove all questions, progress and daily stats.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the store cannot be cleared.
    pub async fn reset_all(&self) -> Result<(), ImportError> {
        self.storage.clear_all().await?;
        Ok(())
    }
}
