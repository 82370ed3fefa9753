//! Structural error types.
//!
//! A question whose correct-answer count does not fit its declared type is
//! rejected before any bias analysis runs. The messages are shown verbatim
//! to whoever authored the answers.

use thiserror::Error;

/// Errors from checking an answer set against its question type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// Fewer than two options were supplied.
    #[error("Questions must have at least 2 answers, found {found}")]
    TooFewAnswers { found: usize },

    /// A single-choice question without exactly one correct answer.
    #[error("Single choice questions must have exactly 1 correct answer, found {found}")]
    WrongCorrectCount { found: usize },

    /// `choose_n` question without its `choose_n` count.
    #[error("choose_n parameter is required for choose_n question type")]
    MissingChooseN,

    /// Correct count differs from the declared `choose_n`.
    #[error("Choose {expected} questions must have exactly {expected} correct answers, found {found}")]
    ChooseNMismatch { expected: usize, found: usize },

    /// `choose_n` leaves no distractors.
    #[error("choose_n ({choose_n}) must be less than total answers ({total})")]
    ChooseNTooLarge { choose_n: usize, total: usize },

    /// A select-all question with nothing to select.
    #[error("Select all questions must have at least 1 correct answer")]
    NoCorrectAnswer,
}
