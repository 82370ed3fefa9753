//! Bias rules.
//!
//! Each rule is evaluated independently against the answer set, its length
//! metrics and the thresholds. Set-level rules are emitted first, then the
//! per-answer length rule, then the per-distractor reason rules. Callers
//! that surface "the first N issues" rely on that order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::metrics::LengthMetrics;
use crate::model::{char_len, AnswerRecord};

/// Characters of answer text echoed in an `AnswerTooShort` detail.
const SHORT_ANSWER_PREVIEW: usize = 30;

/// The kinds of bias the rules can detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasIssueType {
    LengthVarianceHigh,
    CorrectTooLong,
    CorrectTooShort,
    AnswerTooShort,
    MissingDistractorReason,
    DistractorReasonTooShort,
}

impl BiasIssueType {
    /// Every issue type, in rule order.
    pub const ALL: [BiasIssueType; 6] = [
        BiasIssueType::LengthVarianceHigh,
        BiasIssueType::CorrectTooLong,
        BiasIssueType::CorrectTooShort,
        BiasIssueType::AnswerTooShort,
        BiasIssueType::MissingDistractorReason,
        BiasIssueType::DistractorReasonTooShort,
    ];

    /// Stable snake_case identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            BiasIssueType::LengthVarianceHigh => "length_variance_high",
            BiasIssueType::CorrectTooLong => "correct_too_long",
            BiasIssueType::CorrectTooShort => "correct_too_short",
            BiasIssueType::AnswerTooShort => "answer_too_short",
            BiasIssueType::MissingDistractorReason => "missing_distractor_reason",
            BiasIssueType::DistractorReasonTooShort => "distractor_reason_too_short",
        }
    }

    /// One-line human description of the rule.
    pub fn description(self) -> &'static str {
        match self {
            BiasIssueType::LengthVarianceHigh => "Answer lengths vary too much from the mean",
            BiasIssueType::CorrectTooLong => "Correct answers are longer than distractors",
            BiasIssueType::CorrectTooShort => "Correct answers are shorter than distractors",
            BiasIssueType::AnswerTooShort => "An answer is below the minimum length",
            BiasIssueType::MissingDistractorReason => "A distractor has no distractor reason",
            BiasIssueType::DistractorReasonTooShort => "A distractor reason is too brief",
        }
    }
}

impl fmt::Display for BiasIssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an issue blocks the answer set or is advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The measured values behind an issue message.
///
/// Serialized flat (no tag), so variants are ordered most-specific first
/// for deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssueDetails {
    LengthVariance {
        variance_percent: f64,
        threshold: f64,
        mean_length: f64,
        min_length: usize,
        max_length: usize,
    },
    RatioAboveMax {
        ratio: f64,
        correct_avg: f64,
        distractor_avg: f64,
        max_ratio: f64,
    },
    RatioBelowMin {
        ratio: f64,
        correct_avg: f64,
        distractor_avg: f64,
        min_ratio: f64,
    },
    ShortAnswer {
        answer_index: usize,
        length: usize,
        min_length: usize,
        text_preview: String,
    },
    ShortReason {
        answer_index: usize,
        length: usize,
        min_length: usize,
    },
    MissingReason {
        answer_index: usize,
    },
}

impl IssueDetails {
    /// Zero-based index of the answer this issue is about, if any.
    pub fn answer_index(&self) -> Option<usize> {
        match self {
            IssueDetails::ShortAnswer { answer_index, .. }
            | IssueDetails::ShortReason { answer_index, .. }
            | IssueDetails::MissingReason { answer_index } => Some(*answer_index),
            _ => None,
        }
    }
}

/// A detected bias issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasIssue {
    #[serde(rename = "type")]
    pub issue_type: BiasIssueType,
    pub severity: Severity,
    pub message: String,
    pub details: IssueDetails,
}

/// Issues (blocking) and warnings (advisory) for one answer set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    pub issues: Vec<BiasIssue>,
    pub warnings: Vec<BiasIssue>,
}

impl RuleOutcome {
    fn push(&mut self, issue: BiasIssue) {
        match issue.severity {
            Severity::Error => self.issues.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }
}

/// Apply every bias rule to an answer set.
pub fn evaluate_rules(
    answers: &[AnswerRecord],
    metrics: &LengthMetrics,
    thresholds: &Thresholds,
) -> RuleOutcome {
    let mut outcome = RuleOutcome::default();

    if metrics.length_variance_percent > thresholds.max_length_variance_percent {
        outcome.push(BiasIssue {
            issue_type: BiasIssueType::LengthVarianceHigh,
            severity: Severity::Error,
            message: format!(
                "Answer lengths vary too much ({:.1}% from mean). Target: within {:.1}% of mean.",
                metrics.length_variance_percent, thresholds.max_length_variance_percent
            ),
            details: IssueDetails::LengthVariance {
                variance_percent: metrics.length_variance_percent,
                threshold: thresholds.max_length_variance_percent,
                mean_length: metrics.mean_length,
                min_length: metrics.min_length,
                max_length: metrics.max_length,
            },
        });
    }

    if metrics.correct_distractor_ratio > thresholds.max_correct_distractor_ratio {
        outcome.push(BiasIssue {
            issue_type: BiasIssueType::CorrectTooLong,
            severity: Severity::Error,
            message: format!(
                "Correct answer(s) are {:.2}x longer than distractors. Target: ratio between {} and {}.",
                metrics.correct_distractor_ratio,
                thresholds.min_correct_distractor_ratio,
                thresholds.max_correct_distractor_ratio
            ),
            details: IssueDetails::RatioAboveMax {
                ratio: metrics.correct_distractor_ratio,
                correct_avg: metrics.correct_avg_length,
                distractor_avg: metrics.distractor_avg_length,
                max_ratio: thresholds.max_correct_distractor_ratio,
            },
        });
    }

    if metrics.correct_distractor_ratio < thresholds.min_correct_distractor_ratio {
        outcome.push(BiasIssue {
            issue_type: BiasIssueType::CorrectTooShort,
            severity: Severity::Warning,
            message: format!(
                "Correct answer(s) are {:.2}x the length of distractors. Consider expanding correct answers.",
                metrics.correct_distractor_ratio
            ),
            details: IssueDetails::RatioBelowMin {
                ratio: metrics.correct_distractor_ratio,
                correct_avg: metrics.correct_avg_length,
                distractor_avg: metrics.distractor_avg_length,
                min_ratio: thresholds.min_correct_distractor_ratio,
            },
        });
    }

    for (i, answer) in answers.iter().enumerate() {
        let length = answer.len();
        if length < thresholds.min_answer_length {
            outcome.push(BiasIssue {
                issue_type: BiasIssueType::AnswerTooShort,
                severity: Severity::Error,
                message: format!(
                    "Answer {} is too short ({} chars). Minimum: {}.",
                    i + 1,
                    length,
                    thresholds.min_answer_length
                ),
                details: IssueDetails::ShortAnswer {
                    answer_index: i,
                    length,
                    min_length: thresholds.min_answer_length,
                    text_preview: answer.text.chars().take(SHORT_ANSWER_PREVIEW).collect(),
                },
            });
        }
    }

    for (i, answer) in answers.iter().enumerate() {
        if answer.is_correct {
            continue;
        }

        // An empty reason counts as missing.
        let reason = answer
            .distractor_reason
            .as_deref()
            .filter(|r| !r.is_empty());

        match reason {
            None if thresholds.require_distractor_reason => {
                outcome.push(BiasIssue {
                    issue_type: BiasIssueType::MissingDistractorReason,
                    severity: Severity::Error,
                    message: format!(
                        "Answer {} (distractor) is missing 'distractor_reason'. Explain why this wrong answer is tempting.",
                        i + 1
                    ),
                    details: IssueDetails::MissingReason { answer_index: i },
                });
            }
            Some(reason) if char_len(reason) < thresholds.min_distractor_reason_length => {
                let length = char_len(reason);
                outcome.push(BiasIssue {
                    issue_type: BiasIssueType::DistractorReasonTooShort,
                    severity: Severity::Warning,
                    message: format!(
                        "Answer {} distractor_reason is too brief ({} chars). Consider expanding to at least {} chars.",
                        i + 1,
                        length,
                        thresholds.min_distractor_reason_length
                    ),
                    details: IssueDetails::ShortReason {
                        answer_index: i,
                        length,
                        min_length: thresholds.min_distractor_reason_length,
                    },
                });
            }
            _ => {}
        }
    }

    outcome
}
