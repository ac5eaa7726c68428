use std::collections::HashMap;

use thiserror::Error;

use crate::model::{OptionIndex, QuestionId};

/// A line that does not look like `1-a`, `1.b`, `1:c`, `1 d` or `1a`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid answer line {line:?} (expected a format like `1-a` or `1 A`)")]
pub struct AnswerKeyError {
    pub line: String,
}

/// Parsed answer key: question id to correct option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKeyReport {
    pub answers: HashMap<QuestionId, OptionIndex>,
    pub errors: Vec<AnswerKeyError>,
}

impl AnswerKeyReport {
    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<OptionIndex> {
        self.answers.get(id).copied()
    }
}

const SEPARATORS: [char; 3] = ['-', '.', ':'];

/// Match one trimmed line against `<digits> [sep] <a-d>`.
///
/// Whitespace may surround the separator; at most one of `-`, `.` or `:` is
/// accepted, and whitespace alone also separates.
#[must_use]
pub fn parse_answer_line(line: &str) -> Option<(QuestionId, OptionIndex)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let (numeral, rest) = line.split_at(digits);

    let rest = rest.trim_start();
    let rest = rest.strip_prefix(SEPARATORS).unwrap_or(rest).trim_start();

    let mut chars = rest.chars();
    let letter = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let index = OptionIndex::from_letter(letter).ok()?;

    Some((QuestionId::new(numeral), index))
}

/// Parse an answer key where entries are separated by newlines, commas or
/// semicolons. A later entry for the same question replaces an earlier one.
#[must_use]
pub fn parse_answer_key(text: &str) -> AnswerKeyReport {
    let mut report = AnswerKeyReport::default();

    for line in text.split(['\n', ',', ';']) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_answer_line(line) {
            Some((id, index)) => {
                report.answers.insert(id, index);
            }
            None => report.errors.push(AnswerKeyError {
                line: line.to_owned(),
            }),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(i: usize) -> OptionIndex {
        OptionIndex::new(i).unwrap()
    }

    #[test]
    fn comma_separated_key() {
        let report = parse_answer_key("1-a, 2-c, 3-b");
        assert!(report.errors.is_empty());
        assert_eq!(report.answers.len(), 3);
        assert_eq!(report.get(&"1".into()), Some(index(0)));
        assert_eq!(report.get(&"2".into()), Some(index(2)));
        assert_eq!(report.get(&"3".into()), Some(index(1)));
    }

    #[test]
    fn invalid_letter_is_reported() {
        let report = parse_answer_key("1 X");
        assert!(report.answers.is_empty());
        assert_eq!(
            report.errors,
            vec![AnswerKeyError {
                line: "1 X".to_owned()
            }]
        );
    }

    #[test]
    fn accepted_separators() {
        for line in ["4-d", "4.d", "4:d", "4 d", "4d", "4 - D", "4  :  d"] {
            assert_eq!(
                parse_answer_line(line),
                Some((QuestionId::new("4"), index(3))),
                "{line}"
            );
        }
    }

    #[test]
    fn rejected_shapes() {
        for line in ["4--d", "4-.d", "a-4", "4-ab", "4_d", "Q4-d", "4-d!", "-d"] {
            assert_eq!(parse_answer_line(line), None, "{line}");
        }
    }

    #[test]
    fn newline_and_semicolon_separate_entries() {
        let report = parse_answer_key("1 A\n2 B;3 c\r\n\n ,  ;");
        assert!(report.errors.is_empty());
        assert_eq!(report.answers.len(), 3);
        assert_eq!(report.get(&"3".into()), Some(index(2)));
    }

    #[test]
    fn later_entry_replaces_earlier() {
        let report = parse_answer_key("5-a, 5-d");
        assert_eq!(report.get(&"5".into()), Some(index(3)));
    }

    #[test]
    fn errors_keep_input_order() {
        let report = parse_answer_key("x, 1-a, y");
        let lines: Vec<&str> = report.errors.iter().map(|e| e.line.as_str()).collect();
        assert_eq!(lines, vec!["x", "y"]);
        assert_eq!(report.answers.len(), 1);
    }
}
