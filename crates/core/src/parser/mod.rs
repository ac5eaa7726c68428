pub mod answer_key;
pub mod questions;

pub use answer_key::{AnswerKeyError, AnswerKeyReport, parse_answer_key, parse_answer_line};
pub use questions::{
    OptionScan, QuestionParseError, QuestionParseReport, Segment, parse_questions, scan_options,
    split_segments,
};
