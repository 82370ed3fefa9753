//! biascheck-core: answer bias detection and quality scoring.
//!
//! This crate defines the question-bank data model and the deterministic
//! engine that flags multiple-choice answer sets whose correct answer can be
//! spotted from length alone.

pub mod analysis;
pub mod batch;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod guidance;
pub mod metrics;
pub mod model;
pub mod parser;
pub mod report;
pub mod rules;
pub mod scoring;

pub use analysis::{analyze_answers, analyze_proposed, BiasAnalysisResult};
pub use config::Thresholds;
pub use model::{AnswerRecord, Grade, QuestionType};
