//! Authoring guidance produced before any answers exist.

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::model::QuestionType;

/// Target answer length when the caller does not ask for one.
pub const DEFAULT_TARGET_LENGTH: usize = 80;

/// What the author is about to write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionShape {
    pub question_type: QuestionType,
    #[serde(default = "default_num_answers")]
    pub num_answers: usize,
    #[serde(default)]
    pub target_length: Option<usize>,
}

fn default_num_answers() -> usize {
    4
}

impl QuestionShape {
    pub fn new(question_type: QuestionType) -> Self {
        Self {
            question_type,
            num_answers: default_num_answers(),
            target_length: None,
        }
    }
}

/// Named constraints every answer set should satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    pub all_answers_similar_length: String,
    pub correct_not_longer: String,
    pub distractors_plausible: String,
}

/// Length targets and advice for writing one question's answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerGuidelines {
    pub question_type: QuestionType,
    pub num_answers: usize,
    pub target_length: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub constraints: Constraints,
    pub anti_patterns: Vec<String>,
    pub tips: Vec<String>,
}

const ANTI_PATTERNS: &[&str] = &[
    "Making correct answers more detailed or comprehensive than distractors",
    "Using vague, obviously-wrong distractors like 'None of the above' or 'All of the above'",
    "Starting correct answers with more specific technical terms",
    "Including hedging language only in incorrect answers",
    "Making only the correct answer grammatically complete",
];

const TIPS: &[&str] = &[
    "Write all answers first, then check lengths match",
    "Add context/detail to short distractors",
    "Trim overly-detailed correct answers",
    "Each distractor should represent a common misconception",
];

/// Compute length targets for a question shape. Performs no text analysis.
pub fn answer_guidelines(shape: &QuestionShape, thresholds: &Thresholds) -> AnswerGuidelines {
    let target_length = shape.target_length.unwrap_or(DEFAULT_TARGET_LENGTH);
    let spread = thresholds.max_length_variance_percent / 100.0;

    // Float-to-usize casts truncate and saturate at zero.
    let lower = (target_length as f64 * (1.0 - spread)) as usize;
    let upper = (target_length as f64 * (1.0 + spread)) as usize;

    AnswerGuidelines {
        question_type: shape.question_type,
        num_answers: shape.num_answers,
        target_length,
        min_length: lower.max(thresholds.min_answer_length),
        max_length: upper,
        constraints: Constraints {
            all_answers_similar_length: format!(
                "Keep all {} answers within {:.1}% of each other in length.",
                shape.num_answers, thresholds.max_length_variance_percent
            ),
            correct_not_longer:
                "Correct answer(s) should NOT be noticeably longer than incorrect ones.".into(),
            distractors_plausible:
                "Each distractor must be a plausible answer that someone could reasonably choose."
                    .into(),
        },
        anti_patterns: ANTI_PATTERNS.iter().map(|s| s.to_string()).collect(),
        tips: TIPS.iter().map(|s| s.to_string()).collect(),
    }
}
