//! Core data model types for biascheck.
//!
//! These are the value objects the engine consumes: answer records, the
//! questions and exams that carry them, and the letter grade it hands back.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One answer option as the engine sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// The answer text, measured raw (no trimming).
    pub text: String,
    /// Whether this option is a correct answer.
    #[serde(default)]
    pub is_correct: bool,
    /// For distractors: why this wrong answer is tempting.
    #[serde(default)]
    pub distractor_reason: Option<String>,
}

impl AnswerRecord {
    pub fn correct(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct: true,
            distractor_reason: None,
        }
    }

    pub fn distractor(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct: false,
            distractor_reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.distractor_reason = Some(reason.into());
        self
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// An answer option stored in a question bank, keyed by an opaque id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Caller-supplied identifier, passed through unchanged.
    pub id: String,
    #[serde(flatten)]
    pub record: AnswerRecord,
}

/// How many answers a question expects the taker to pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Exactly one correct answer.
    #[default]
    Single,
    /// Exactly N correct answers.
    ChooseN,
    /// One or more correct answers, all of which must be picked.
    SelectAll,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Single => write!(f, "single"),
            QuestionType::ChooseN => write!(f, "choose_n"),
            QuestionType::SelectAll => write!(f, "select_all"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "single" => Ok(QuestionType::Single),
            "choose_n" => Ok(QuestionType::ChooseN),
            "select_all" => Ok(QuestionType::SelectAll),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A question together with its answer options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub question_type: QuestionType,
    /// For `choose_n`: how many answers to select.
    #[serde(default)]
    pub choose_n: Option<usize>,
    pub answers: Vec<AnswerOption>,
}

impl Question {
    /// The answer records in input order, without their ids.
    pub fn records(&self) -> Vec<AnswerRecord> {
        self.answers.iter().map(|a| a.record.clone()).collect()
    }

    /// Question text cut to `max` characters with a trailing `...`.
    pub fn preview(&self, max: usize) -> String {
        preview(&self.text, max)
    }
}

/// All questions of one certification exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamBank {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// Letter grade derived from a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Every grade, best first.
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];

    /// Map a 0-1 quality score to a grade. Boundaries are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Grade::A
        } else if score >= 0.8 {
            Grade::B
        } else if score >= 0.7 {
            Grade::C
        } else if score >= 0.6 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn is_failing(self) -> bool {
        matches!(self, Grade::D | Grade::F)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "F" => Ok(Grade::F),
            other => Err(format!("unknown grade: {other}")),
        }
    }
}

/// Number of characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// First `max` characters of `s`, with `...` appended if anything was cut.
pub fn preview(s: &str, max: usize) -> String {
    if char_len(s) > max {
        let head: String = s.chars().take(max).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_display_and_parse() {
        assert_eq!(QuestionType::ChooseN.to_string(), "choose_n");
        assert_eq!("single".parse::<QuestionType>().unwrap(), QuestionType::Single);
        assert_eq!(
            "select-all".parse::<QuestionType>().unwrap(),
            QuestionType::SelectAll
        );
        assert!("essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn grade_boundaries() {
        assert_eq!(Grade::from_score(0.90), Grade::A);
        assert_eq!(Grade::from_score(0.89), Grade::B);
        assert_eq!(Grade::from_score(0.80), Grade::B);
        assert_eq!(Grade::from_score(0.79), Grade::C);
        assert_eq!(Grade::from_score(0.70), Grade::C);
        assert_eq!(Grade::from_score(0.69), Grade::D);
        assert_eq!(Grade::from_score(0.60), Grade::D);
        assert_eq!(Grade::from_score(0.59), Grade::F);
    }

    #[test]
    fn grade_parse_and_order() {
        assert_eq!("d".parse::<Grade>().unwrap(), Grade::D);
        assert!("E".parse::<Grade>().is_err());
        assert!(Grade::A < Grade::F);
        assert!(Grade::F.is_failing());
        assert!(!Grade::C.is_failing());
    }

    #[test]
    fn preview_counts_characters() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdef", 3), "abc...");
        assert_eq!(preview("ééééé", 2), "éé...");
        assert_eq!(char_len("ééé"), 3);
    }

    #[test]
    fn answer_option_flattens_record() {
        let json = r#"{"id":"a1","text":"Use S3","is_correct":true}"#;
        let option: AnswerOption = serde_json::from_str(json).unwrap();
        assert_eq!(option.id, "a1");
        assert!(option.record.is_correct);
        assert!(option.record.distractor_reason.is_none());
    }
}
