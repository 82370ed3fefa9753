//! Saved bias report envelope with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::batch::{ExamBiasReport, RemediationPlan};
use crate::config::Thresholds;

/// A complete bias report for one exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Thresholds the exam was analyzed with.
    pub thresholds: Thresholds,
    /// The exam-level aggregate.
    pub exam: ExamBiasReport,
    /// Questions selected for rewriting, if a plan was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<RemediationPlan>,
}

impl BiasReport {
    pub fn new(
        thresholds: Thresholds,
        exam: ExamBiasReport,
        remediation: Option<RemediationPlan>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            thresholds,
            exam,
            remediation,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: BiasReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// True if any question graded D or F.
    pub fn has_failing_questions(&self) -> bool {
        self.exam
            .grade_distribution
            .iter()
            .any(|(grade, count)| grade.is_failing() && count > 0)
    }

    /// Format the report as markdown, suitable for a PR comment.
    pub fn to_markdown(&self) -> String {
        let exam = &self.exam;
        let mut md = String::new();

        md.push_str(&format!("## Answer bias report: {}\n\n", exam.exam_name));
        md.push_str(&format!(
            "**Summary:** {} questions, average quality {:.1}%\n\n",
            exam.total_questions,
            exam.average_quality_score * 100.0
        ));

        md.push_str("| Grade | Questions |\n");
        md.push_str("|-------|-----------|\n");
        for (grade, count) in exam.grade_distribution.iter() {
            md.push_str(&format!("| {grade} | {count} |\n"));
        }
        md.push('\n');

        if !exam.worst_offenders.is_empty() {
            md.push_str("### Worst offenders\n\n");
            md.push_str("| Question | Score | Grade | Issues |\n");
            md.push_str("|----------|-------|-------|--------|\n");
            for o in &exam.worst_offenders {
                md.push_str(&format!(
                    "| {} | {:.1}% | {} | {} |\n",
                    o.question_id,
                    o.quality_score * 100.0,
                    o.quality_grade,
                    o.issues.join("; ").replace('|', "\\|")
                ));
            }
            md.push('\n');
        }

        if !exam.recommendations.is_empty() {
            md.push_str("### Recommendations\n\n");
            for rec in &exam.recommendations {
                md.push_str(&format!("- {rec}\n"));
            }
            md.push('\n');
        }

        if let Some(plan) = &self.remediation {
            md.push_str(&format!(
                "### Remediation ({} of {} below grade {})\n\n",
                plan.returned_count, plan.biased_count, plan.grade_floor
            ));
            for q in &plan.questions {
                md.push_str(&format!(
                    "- **{}** (target {} chars): {}\n",
                    q.question_id, q.target_length, q.primary_issue
                ));
                for a in &q.answers {
                    md.push_str(&format!(
                        "  - `{}`{} {} chars: {}\n",
                        a.answer_id,
                        if a.is_correct { " (correct)" } else { "" },
                        a.current_length,
                        a.instruction
                    ));
                }
            }
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{analyze_exam, remediation_plan, GradeFloor};
    use crate::model::{AnswerOption, AnswerRecord, ExamBank, Question, QuestionType};

    fn exam() -> ExamBank {
        let answers = [
            AnswerRecord::correct("A".repeat(180)),
            AnswerRecord::distractor("B".repeat(20)),
            AnswerRecord::distractor("C".repeat(20)),
            AnswerRecord::distractor("D".repeat(20)),
        ];
        ExamBank {
            id: "exam-1".into(),
            name: "Storage basics".into(),
            description: String::new(),
            questions: vec![Question {
                id: "lopsided".into(),
                text: "Which option is correct?".into(),
                question_type: QuestionType::Single,
                choose_n: None,
                answers: answers
                    .into_iter()
                    .enumerate()
                    .map(|(i, record)| AnswerOption {
                        id: format!("a{}", i + 1),
                        record,
                    })
                    .collect(),
            }],
        }
    }

    fn make_report() -> BiasReport {
        let thresholds = Thresholds::default();
        let exam = exam();
        BiasReport::new(
            thresholds.clone(),
            analyze_exam(&exam, &thresholds, true),
            Some(remediation_plan(&exam, &thresholds, GradeFloor::D, 20)),
        )
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = BiasReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.exam, report.exam);
        assert_eq!(loaded.remediation, report.remediation);
    }

    #[test]
    fn load_missing_file_names_path() {
        let err = BiasReport::load_json(Path::new("/nonexistent/report.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/report.json"));
    }

    #[test]
    fn failing_questions_detected() {
        assert!(make_report().has_failing_questions());
    }

    #[test]
    fn markdown_output() {
        let md = make_report().to_markdown();
        assert!(md.contains("Answer bias report: Storage basics"));
        assert!(md.contains("| F | 1 |"));
        assert!(md.contains("Worst offenders"));
        assert!(md.contains("lopsided"));
        assert!(md.contains("SHORTEN by ~120 chars"));
        assert!(md.contains("EXPAND by ~40 chars"));
    }
}
