//! Length statistics over one answer set.

use serde::{Deserialize, Serialize};

use crate::model::{preview, AnswerRecord};

/// Characters kept in a per-answer text preview.
const PREVIEW_CHARS: usize = 50;

/// Length statistics for a set of answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthMetrics {
    /// Mean length over all answers.
    pub mean_length: f64,
    pub min_length: usize,
    pub max_length: usize,
    /// Mean length of the correct answers (0 if there are none).
    pub correct_avg_length: f64,
    /// Mean length of the distractors (0 if there are none).
    pub distractor_avg_length: f64,
    /// `correct_avg / distractor_avg`, or exactly 1.0 without distractors.
    pub correct_distractor_ratio: f64,
    /// Largest absolute deviation from the mean, as a percent of the mean.
    pub length_variance_percent: f64,
    /// Per-answer breakdown in input order.
    pub individual_lengths: Vec<AnswerLength>,
}

/// Length details for one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerLength {
    pub text_preview: String,
    pub length: usize,
    pub is_correct: bool,
    /// Signed difference from the mean length.
    pub deviation_from_mean: f64,
    /// Signed difference from the mean length, in percent of the mean.
    pub deviation_percent: f64,
}

impl LengthMetrics {
    /// Metrics for an empty answer set. The ratio stays at 1.0 so that no
    /// ratio rule fires.
    pub fn empty() -> Self {
        Self {
            mean_length: 0.0,
            min_length: 0,
            max_length: 0,
            correct_avg_length: 0.0,
            distractor_avg_length: 0.0,
            correct_distractor_ratio: 1.0,
            length_variance_percent: 0.0,
            individual_lengths: Vec::new(),
        }
    }
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<usize>() as f64 / values.len() as f64
    }
}

/// Compute length statistics for `answers`.
///
/// Never fails: an empty slice yields [`LengthMetrics::empty`].
pub fn compute_length_metrics(answers: &[AnswerRecord]) -> LengthMetrics {
    if answers.is_empty() {
        return LengthMetrics::empty();
    }

    let lengths: Vec<usize> = answers.iter().map(AnswerRecord::len).collect();
    let correct: Vec<usize> = answers
        .iter()
        .zip(&lengths)
        .filter(|(a, _)| a.is_correct)
        .map(|(_, &l)| l)
        .collect();
    let distractors: Vec<usize> = answers
        .iter()
        .zip(&lengths)
        .filter(|(a, _)| !a.is_correct)
        .map(|(_, &l)| l)
        .collect();

    let mean_length = mean(&lengths);
    let correct_avg_length = mean(&correct);
    let distractor_avg_length = mean(&distractors);

    let correct_distractor_ratio = if distractor_avg_length > 0.0 {
        correct_avg_length / distractor_avg_length
    } else {
        1.0
    };

    let length_variance_percent = if mean_length > 0.0 {
        let max_deviation = lengths
            .iter()
            .map(|&l| (l as f64 - mean_length).abs())
            .fold(0.0f64, f64::max);
        max_deviation / mean_length * 100.0
    } else {
        0.0
    };

    let individual_lengths = answers
        .iter()
        .zip(&lengths)
        .map(|(answer, &length)| {
            let deviation = length as f64 - mean_length;
            AnswerLength {
                text_preview: preview(&answer.text, PREVIEW_CHARS),
                length,
                is_correct: answer.is_correct,
                deviation_from_mean: deviation,
                deviation_percent: if mean_length > 0.0 {
                    deviation / mean_length * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect();

    LengthMetrics {
        mean_length,
        min_length: lengths.iter().copied().min().unwrap_or(0),
        max_length: lengths.iter().copied().max().unwrap_or(0),
        correct_avg_length,
        distractor_avg_length,
        correct_distractor_ratio,
        length_variance_percent,
        individual_lengths,
    }
}
