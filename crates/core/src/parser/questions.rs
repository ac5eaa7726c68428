//! Question-block parser.
//!
//! Parsing runs in two stages. [`split_segments`] finds the numbered entries
//! (`12. ...` at the start of a line) and [`scan_options`] finds the lettered
//! option spans (`a)` .. `d)`) inside one entry.

use thiserror::Error;

use crate::model::{OptionIndex, Question, QuestionError, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Why a numbered entry was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionParseError {
    #[error("question {number}: expected 4 options (a, b, c, d), found {found}")]
    MissingOptions { number: u32, found: usize },

    #[error("question {number}: option {letter}) is empty")]
    EmptyOption { number: u32, letter: char },

    #[error("question {numeral}: number is too large")]
    NumberOutOfRange { numeral: String },
}

impl QuestionParseError {
    /// Enumeration number of the rejected entry, `None` when it does not fit.
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        match self {
            Self::MissingOptions { number, .. } | Self::EmptyOption { number, .. } => {
                Some(*number)
            }
            Self::NumberOutOfRange { .. } => None,
        }
    }
}

/// Accepted questions and rejected entries, both in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionParseReport {
    pub questions: Vec<Question>,
    pub errors: Vec<QuestionParseError>,
}

impl QuestionParseReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

//
// ─── STAGE 1: SEGMENTS ─────────────────────────────────────────────────────────
//

/// One numbered entry: the numeral as written and the text that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub numeral: &'a str,
    /// `None` when the numeral does not fit in a `u32`.
    pub number: Option<u32>,
    pub body: &'a str,
}

struct Introducer<'a> {
    start: usize,
    numeral: &'a str,
    number: Option<u32>,
    body_start: usize,
}

/// Matches `<ws>* <digits> . <ws>` at byte offset `at`.
fn match_introducer(text: &str, at: usize) -> Option<Introducer<'_>> {
    let rest = &text[at..];
    let unindented = rest.trim_start();
    let numeral_start = at + (rest.len() - unindented.len());

    let digits = unindented.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let numeral = &unindented[..digits];
    let after_dot = unindented[digits..].strip_prefix('.')?;
    if !after_dot.starts_with(char::is_whitespace) {
        return None;
    }
    let number = numeral.parse::<u32>().ok();

    Some(Introducer {
        start: at,
        numeral,
        number,
        body_start: numeral_start + digits + 1,
    })
}

fn line_starts(text: &str) -> impl Iterator<Item = usize> + '_ {
    std::iter::once(0).chain(text.match_indices('\n').map(|(i, _)| i + 1))
}

/// Split text into numbered entries.
///
/// An entry starts at the beginning of a line (leading whitespace allowed)
/// with an integer, a dot, and whitespace. Text before the first entry is
/// dropped.
#[must_use]
pub fn split_segments(text: &str) -> Vec<Segment<'_>> {
    let mut introducers: Vec<Introducer<'_>> = Vec::new();
    for at in line_starts(text) {
        if introducers.last().is_some_and(|prev| at < prev.body_start) {
            continue;
        }
        if let Some(intro) = match_introducer(text, at) {
            introducers.push(intro);
        }
    }

    introducers
        .iter()
        .enumerate()
        .map(|(i, intro)| {
            let end = introducers.get(i + 1).map_or(text.len(), |next| next.start);
            Segment {
                numeral: intro.numeral,
                number: intro.number,
                body: &text[intro.body_start..end],
            }
        })
        .collect()
}

//
// ─── STAGE 2: OPTIONS ──────────────────────────────────────────────────────────
//

/// Prompt and option slots found in one entry body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionScan {
    pub prompt: String,
    /// `None` for letters that never appeared.
    pub slots: [Option<String>; 4],
}

impl OptionScan {
    /// Number of distinct option letters seen.
    #[must_use]
    pub fn found(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

struct Marker {
    index: OptionIndex,
    start: usize,
    end: usize,
}

fn option_markers(body: &str) -> Vec<Marker> {
    let bytes = body.as_bytes();
    bytes
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1] == b')')
        .filter_map(|(start, pair)| {
            let index = OptionIndex::from_letter(char::from(pair[0])).ok()?;
            Some(Marker {
                index,
                start,
                end: start + 2,
            })
        })
        .collect()
}

/// Find the prompt and the `a)`-`d)` option spans in an entry body.
///
/// Each option runs up to the next marker or the end of the body. A repeated
/// letter replaces the earlier capture.
#[must_use]
pub fn scan_options(body: &str) -> OptionScan {
    let markers = option_markers(body);
    let prompt_end = markers.first().map_or(body.len(), |m| m.start);

    let mut scan = OptionScan {
        prompt: body[..prompt_end].trim().to_owned(),
        slots: Default::default(),
    };

    for (i, marker) in markers.iter().enumerate() {
        let content_end = markers.get(i + 1).map_or(body.len(), |next| next.start);
        let content = body[marker.end..content_end].trim();
        scan.slots[marker.index.value()] = Some(content.to_owned());
    }

    scan
}

//
// ─── PARSE ─────────────────────────────────────────────────────────────────────
//

fn build_question(segment: &Segment<'_>) -> Result<Question, QuestionParseError> {
    let Some(number) = segment.number else {
        return Err(QuestionParseError::NumberOutOfRange {
            numeral: segment.numeral.to_owned(),
        });
    };
    let scan = scan_options(segment.body);
    let found = scan.found();
    let [Some(a), Some(b), Some(c), Some(d)] = scan.slots else {
        return Err(QuestionParseError::MissingOptions {
            number,
            found,
        });
    };

    Question::new(
        QuestionId::new(segment.numeral),
        number,
        scan.prompt,
        [a, b, c, d],
    )
    .map_err(|err| match err {
        QuestionError::EmptyOption { letter } => QuestionParseError::EmptyOption {
            number,
            letter,
        },
    })
}

/// Parse pasted text into questions.
///
/// Every numbered entry ends up either in `questions` or in `errors`.
#[must_use]
pub fn parse_questions(text: &str) -> QuestionParseReport {
    let mut report = QuestionParseReport::default();
    for segment in split_segments(text) {
        match build_question(&segment) {
            Ok(question) => report.questions.push(question),
            Err(err) => report.errors.push(err),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_line_question() {
        let report = parse_questions("3. Q? a) alpha b) beta c) gamma d) delta");
        assert!(report.is_clean());
        assert_eq!(report.questions.len(), 1);

        let q = &report.questions[0];
        assert_eq!(q.number, 3);
        assert_eq!(q.id, QuestionId::new("3"));
        assert_eq!(q.prompt, "Q?");
        assert_eq!(q.options, ["alpha", "beta", "gamma", "delta"]);
        assert_eq!(q.correct_index, None);
    }

    #[test]
    fn three_options_is_rejected() {
        let report = parse_questions("1. Q? a) x b) y c) z");
        assert!(report.questions.is_empty());
        assert_eq!(
            report.errors,
            vec![QuestionParseError::MissingOptions { number: 1, found: 3 }]
        );
    }

    #[test]
    fn empty_option_is_rejected() {
        let report = parse_questions("2. Q? a) x b) y c) d) z");
        assert!(report.questions.is_empty());
        assert_eq!(
            report.errors,
            vec![QuestionParseError::EmptyOption {
                number: 2,
                letter: 'c'
            }]
        );
        assert_eq!(report.errors[0].number(), Some(2));
    }

    #[test]
    fn multi_line_entries_keep_input_order() {
        let text = "\
Intro text that is not a question.
7. First?
a) one
b) two
c) three
d) four
2. Second?
A) uno B) dos C) tres D) cuatro
";
        let report = parse_questions(text);
        assert!(report.is_clean());
        let numbers: Vec<u32> = report.questions.iter().map(|q| q.number).collect();
        assert_eq!(numbers, vec![7, 2]);
        assert_eq!(report.questions[0].options[3], "four");
        assert_eq!(report.questions[1].options[0], "uno");
    }

    #[test]
    fn id_keeps_literal_numeral() {
        let report = parse_questions("007. Q a) 1 b) 2 c) 3 d) 4");
        assert_eq!(report.questions[0].id.as_str(), "007");
        assert_eq!(report.questions[0].number, 7);
    }

    #[test]
    fn duplicate_letter_last_wins() {
        let report = parse_questions("1. Q a) first b) y a) second c) z d) w");
        assert_eq!(report.questions[0].options[0], "second");
    }

    #[test]
    fn duplicate_letter_does_not_count_twice() {
        let report = parse_questions("1. Q a) x a) y b) z c) w");
        assert_eq!(
            report.errors,
            vec![QuestionParseError::MissingOptions { number: 1, found: 3 }]
        );
    }

    #[test]
    fn letters_past_d_are_not_markers() {
        let scan = scan_options("Q a) x b) y e) still b c) z d) w");
        assert_eq!(scan.slots[1].as_deref(), Some("y e) still b"));
        assert_eq!(scan.found(), 4);
    }

    #[test]
    fn empty_prompt_is_allowed() {
        let report = parse_questions("5. a) x b) y c) z d) w");
        assert_eq!(report.questions[0].prompt, "");
    }

    #[test]
    fn numbered_entry_without_body_is_reported() {
        let report = parse_questions("1. \n2. Q a) x b) y c) z d) w");
        assert_eq!(report.questions.len(), 1);
        assert_eq!(report.questions[0].number, 2);
        assert_eq!(
            report.errors,
            vec![QuestionParseError::MissingOptions { number: 1, found: 0 }]
        );
    }

    #[test]
    fn introducer_must_start_a_line() {
        let segments = split_segments("1. Q costs 2. dollars a) x b) y c) z d) w");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].number, Some(1));
    }

    #[test]
    fn introducer_requires_whitespace_after_dot() {
        assert!(split_segments("1.5 is a decimal").is_empty());
        assert_eq!(split_segments("   4.\tQ").len(), 1);
    }

    #[test]
    fn every_segment_is_accounted_for() {
        let text = "1. a) x b) y c) z d) w\n2. nope\n3. a) x b) c) z d) w\n4. a) 1 b) 2 c) 3 d) 4";
        let report = parse_questions(text);
        let segments = split_segments(text).len();
        assert_eq!(segments, 4);
        assert_eq!(report.questions.len() + report.errors.len(), segments);
    }

    #[test]
    fn oversized_number_is_rejected_without_touching_previous_entry() {
        let text = "1. Q a) w b) x c) y d) z\n99999999999. R a) p b) q c) r d) s";
        let report = parse_questions(text);

        assert_eq!(report.questions.len() + report.errors.len(), 2);
        assert_eq!(report.questions.len(), 1);
        assert_eq!(report.questions[0].options, ["w", "x", "y", "z"]);
        assert_eq!(
            report.errors,
            vec![QuestionParseError::NumberOutOfRange {
                numeral: "99999999999".to_owned()
            }]
        );
        assert_eq!(report.errors[0].number(), None);
    }

    #[test]
    fn non_ascii_text_is_preserved() {
        let report = parse_questions("1. Qaysi? a) olma b) o‘rik c) nok d) behi");
        assert_eq!(report.questions[0].prompt, "Qaysi?");
        assert_eq!(report.questions[0].options[1], "o‘rik");
    }
}
