//! Quality score aggregation.
//!
//! The score starts at 1.0 and loses weight for length variance, for a
//! correct/distractor ratio away from 1.0, and a fixed amount per issue and
//! per warning. The result is clamped to `[0, 1]`.

use crate::config::Thresholds;
use crate::metrics::LengthMetrics;
use crate::rules::BiasIssue;

/// Share of the score governed by length variance.
pub const VARIANCE_WEIGHT: f64 = 0.30;
/// Share of the score governed by the correct/distractor ratio.
pub const RATIO_WEIGHT: f64 = 0.40;
/// Deduction per error-severity issue. Not capped.
pub const ISSUE_PENALTY: f64 = 0.15;
/// Deduction per warning.
pub const WARNING_PENALTY: f64 = 0.05;

const IDEAL_RATIO: f64 = 1.0;

/// Score before clamping. Exposed so callers can reason about how far below
/// zero a set of issues pushed it.
pub fn raw_quality_score(
    metrics: &LengthMetrics,
    issue_count: usize,
    warning_count: usize,
    thresholds: &Thresholds,
) -> f64 {
    let mut score = 1.0;

    if thresholds.max_length_variance_percent > 0.0 {
        let variance_score = (1.0
            - metrics.length_variance_percent / thresholds.max_length_variance_percent)
            .max(0.0);
        score -= VARIANCE_WEIGHT * (1.0 - variance_score);
    }

    let ratio_deviation = (metrics.correct_distractor_ratio - IDEAL_RATIO).abs();
    let max_deviation = (IDEAL_RATIO - thresholds.min_correct_distractor_ratio)
        .max(thresholds.max_correct_distractor_ratio - IDEAL_RATIO);
    if max_deviation > 0.0 {
        let ratio_score = (1.0 - ratio_deviation / max_deviation).max(0.0);
        score -= RATIO_WEIGHT * (1.0 - ratio_score);
    }

    score -= issue_count as f64 * ISSUE_PENALTY;
    score -= warning_count as f64 * WARNING_PENALTY;
    score
}

/// Quality score in `[0, 1]`, higher is better.
pub fn quality_score(
    metrics: &LengthMetrics,
    issues: &[BiasIssue],
    warnings: &[BiasIssue],
    thresholds: &Thresholds,
) -> f64 {
    raw_quality_score(metrics, issues.len(), warnings.len(), thresholds).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(variance: f64, ratio: f64) -> LengthMetrics {
        LengthMetrics {
            length_variance_percent: variance,
            correct_distractor_ratio: ratio,
            ..LengthMetrics::empty()
        }
    }

    #[test]
    fn perfect_metrics_score_one() {
        let t = Thresholds::default();
        assert_eq!(quality_score(&metrics(0.0, 1.0), &[], &[], &t), 1.0);
    }

    #[test]
    fn variance_component_is_linear_up_to_threshold() {
        let t = Thresholds::default();
        // Half the allowed variance costs half the weight.
        let score = raw_quality_score(&metrics(25.0, 1.0), 0, 0, &t);
        assert!((score - 0.85).abs() < 1e-9);
        // Beyond the threshold the component bottoms out.
        let score = raw_quality_score(&metrics(500.0, 1.0), 0, 0, &t);
        assert!((score - 0.70).abs() < 1e-9);
    }

    #[test]
    fn ratio_component_uses_widest_allowed_deviation() {
        let t = Thresholds::default();
        // max deviation is 0.3 on both sides by default
        let score = raw_quality_score(&metrics(0.0, 1.15), 0, 0, &t);
        assert!((score - 0.80).abs() < 1e-9);
        let score = raw_quality_score(&metrics(0.0, 3.0), 0, 0, &t);
        assert!((score - 0.60).abs() < 1e-9);
    }

    #[test]
    fn zero_denominators_skip_components() {
        let t = Thresholds {
            max_length_variance_percent: 0.0,
            min_correct_distractor_ratio: 1.0,
            max_correct_distractor_ratio: 1.0,
            ..Thresholds::default()
        };
        assert_eq!(raw_quality_score(&metrics(80.0, 2.0), 0, 0, &t), 1.0);
    }

    #[test]
    fn each_issue_and_warning_has_a_fixed_cost() {
        let t = Thresholds::default();
        let m = metrics(10.0, 1.05);
        let base = raw_quality_score(&m, 0, 0, &t);
        let one_issue = raw_quality_score(&m, 1, 0, &t);
        let one_warning = raw_quality_score(&m, 0, 1, &t);
        assert!((base - one_issue - 0.15).abs() < 1e-12);
        assert!((base - one_warning - 0.05).abs() < 1e-12);
    }

    #[test]
    fn many_issues_clamp_to_zero() {
        let t = Thresholds::default();
        let raw = raw_quality_score(&metrics(0.0, 1.0), 7, 0, &t);
        assert!(raw < 0.0);
        let issue = crate::rules::BiasIssue {
            issue_type: crate::rules::BiasIssueType::AnswerTooShort,
            severity: crate::rules::Severity::Error,
            message: String::new(),
            details: crate::rules::IssueDetails::MissingReason { answer_index: 0 },
        };
        let issues = vec![issue; 7];
        assert_eq!(quality_score(&metrics(0.0, 1.0), &issues, &[], &t), 0.0);
    }
}
