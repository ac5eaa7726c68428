use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable textual identifier for a question.
///
/// Holds the enumeration numeral exactly as it appeared in the imported text,
/// so `"07"` and `"7"` are different ids.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── OPTION INDEX ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionIndexError {
    #[error("option index out of range: {0} (expected 0-3)")]
    OutOfRange(usize),
    #[error("not an option letter: {0:?}")]
    InvalidLetter(char),
}

/// Position of one of the four options, `0..=3` (`a`..=`d`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct OptionIndex(u8);

impl OptionIndex {
    pub const COUNT: usize = 4;

    /// Creates an `OptionIndex` from a zero-based position.
    ///
    /// # Errors
    ///
    /// Returns `OptionIndexError::OutOfRange` if `index` is not in `0..=3`.
    pub fn new(index: usize) -> Result<Self, OptionIndexError> {
        match u8::try_from(index) {
            Ok(value) if index < Self::COUNT => Ok(Self(value)),
            _ => Err(OptionIndexError::OutOfRange(index)),
        }
    }

    /// Maps an option letter (`a`-`d`, any case) to its index.
    ///
    /// # Errors
    ///
    /// Returns `OptionIndexError::InvalidLetter` for any other character.
    pub fn from_letter(letter: char) -> Result<Self, OptionIndexError> {
        match letter.to_ascii_lowercase() {
            'a' => Ok(Self(0)),
            'b' => Ok(Self(1)),
            'c' => Ok(Self(2)),
            'd' => Ok(Self(3)),
            _ => Err(OptionIndexError::InvalidLetter(letter)),
        }
    }

    /// All four indices in display order.
    #[must_use]
    pub fn all() -> [Self; 4] {
        [Self(0), Self(1), Self(2), Self(3)]
    }

    #[must_use]
    pub fn value(self) -> usize {
        usize::from(self.0)
    }

    /// Lowercase option letter.
    #[must_use]
    pub fn letter(self) -> char {
        char::from(b'a' + self.0)
    }
}

impl TryFrom<u8> for OptionIndex {
    type Error = OptionIndexError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(usize::from(value))
    }
}

impl From<OptionIndex> for u8 {
    fn from(value: OptionIndex) -> Self {
        value.0
    }
}

impl fmt::Debug for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionIndex({})", self.0)
    }
}

impl fmt::Display for OptionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
