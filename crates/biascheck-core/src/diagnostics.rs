//! Human-readable remediation messages.

use crate::analysis::BiasAnalysisResult;

/// Render a failed analysis as a numbered list of issues, the warnings, the
/// metrics summary, and a closing instruction.
pub fn format_bias_failure(result: &BiasAnalysisResult) -> String {
    let mut lines: Vec<String> = vec!["Answer bias validation failed:".into(), String::new()];

    for (i, issue) in result.issues.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, issue.message));
        lines.push(String::new());
    }

    if !result.warnings.is_empty() {
        lines.push("Warnings:".into());
        for warning in &result.warnings {
            lines.push(format!("  - {}", warning.message));
        }
        lines.push(String::new());
    }

    if let Some(metrics) = &result.metrics {
        lines.push("Current metrics:".into());
        lines.push(format!(
            "  - Mean answer length: {:.0} chars",
            metrics.mean_length
        ));
        lines.push(format!(
            "  - Correct avg: {:.0} chars",
            metrics.correct_avg_length
        ));
        lines.push(format!(
            "  - Distractor avg: {:.0} chars",
            metrics.distractor_avg_length
        ));
        lines.push(format!(
            "  - Correct/Distractor ratio: {:.2}x",
            metrics.correct_distractor_ratio
        ));
        lines.push(String::new());
    }

    lines.push("Rewrite answers to address these issues before retrying.".into());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_answers;
    use crate::config::Thresholds;
    use crate::model::AnswerRecord;

    #[test]
    fn lists_issues_then_warnings_then_metrics() {
        let answers = vec![
            AnswerRecord::correct("A long correct answer that explains everything in detail"),
            AnswerRecord::distractor("Nope").with_reason("tempting"),
            AnswerRecord::distractor("Wrong one here"),
        ];
        let result = analyze_answers(&answers, &Thresholds::default());
        let msg = format_bias_failure(&result);

        assert!(msg.starts_with("Answer bias validation failed:"));
        assert!(msg.contains("1. Answer lengths vary too much"));
        assert!(msg.contains("2. Correct answer(s) are"));
        assert!(msg.contains("Warnings:\n  - Answer 2 distractor_reason is too brief"));
        assert!(msg.contains("Correct/Distractor ratio:"));
        assert!(msg.ends_with("Rewrite answers to address these issues before retrying."));

        let issues_at = msg.find("1. ").unwrap();
        let warnings_at = msg.find("Warnings:").unwrap();
        let metrics_at = msg.find("Current metrics:").unwrap();
        assert!(issues_at < warnings_at && warnings_at < metrics_at);
    }

    #[test]
    fn no_warnings_section_when_there_are_none() {
        let answers = vec![AnswerRecord::correct("OK"), AnswerRecord::distractor("No")];
        let result = analyze_answers(&answers, &Thresholds::default());
        let msg = format_bias_failure(&result);
        assert!(!msg.contains("Warnings:"));
        assert!(msg.contains("  - Mean answer length: 2 chars"));
    }
}
