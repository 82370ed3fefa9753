//! Single-question analysis entry points.

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::error::StructureError;
use crate::metrics::{compute_length_metrics, LengthMetrics};
use crate::model::{preview, AnswerRecord, Grade, Question, QuestionType};
use crate::rules::{evaluate_rules, BiasIssue};
use crate::scoring::quality_score;

/// Verdict for one answer set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasAnalysisResult {
    /// True iff there are no error-severity issues.
    pub is_valid: bool,
    pub issues: Vec<BiasIssue>,
    pub warnings: Vec<BiasIssue>,
    /// The metrics the verdict was computed from.
    pub metrics: Option<LengthMetrics>,
    /// 0-1, higher is better.
    pub quality_score: f64,
    pub quality_grade: Grade,
}

/// Analyze an answer set for length bias.
///
/// Total over any input: an empty slice scores as a perfect, issue-free set
/// with sentinel metrics.
pub fn analyze_answers(answers: &[AnswerRecord], thresholds: &Thresholds) -> BiasAnalysisResult {
    let metrics = compute_length_metrics(answers);
    let outcome = evaluate_rules(answers, &metrics, thresholds);
    let score = quality_score(&metrics, &outcome.issues, &outcome.warnings, thresholds);

    BiasAnalysisResult {
        is_valid: outcome.issues.is_empty(),
        issues: outcome.issues,
        warnings: outcome.warnings,
        metrics: Some(metrics),
        quality_score: score,
        quality_grade: Grade::from_score(score),
    }
}

/// Check an answer set against the rules of its question type.
pub fn validate_structure(
    question_type: QuestionType,
    answers: &[AnswerRecord],
    choose_n: Option<usize>,
) -> Result<(), StructureError> {
    if answers.len() < 2 {
        return Err(StructureError::TooFewAnswers {
            found: answers.len(),
        });
    }

    let correct = answers.iter().filter(|a| a.is_correct).count();

    match question_type {
        QuestionType::Single => {
            if correct != 1 {
                return Err(StructureError::WrongCorrectCount { found: correct });
            }
        }
        QuestionType::ChooseN => {
            let n = choose_n.ok_or(StructureError::MissingChooseN)?;
            if correct != n {
                return Err(StructureError::ChooseNMismatch {
                    expected: n,
                    found: correct,
                });
            }
            if n >= answers.len() {
                return Err(StructureError::ChooseNTooLarge {
                    choose_n: n,
                    total: answers.len(),
                });
            }
        }
        QuestionType::SelectAll => {
            if correct < 1 {
                return Err(StructureError::NoCorrectAnswer);
            }
        }
    }

    Ok(())
}

/// Validate structure first, then analyze. No metrics are computed for a
/// structurally invalid set.
pub fn analyze_proposed(
    question_type: QuestionType,
    choose_n: Option<usize>,
    answers: &[AnswerRecord],
    thresholds: &Thresholds,
) -> Result<BiasAnalysisResult, StructureError> {
    validate_structure(question_type, answers, choose_n)?;
    Ok(analyze_answers(answers, thresholds))
}

/// Per-answer row of a [`QuestionQuality`] view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSummary {
    pub id: String,
    pub text_preview: String,
    pub length: usize,
    pub is_correct: bool,
    pub has_distractor_reason: bool,
}

/// A stored question's analysis together with per-answer context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionQuality {
    pub question_id: String,
    pub question_preview: String,
    pub analysis: BiasAnalysisResult,
    pub answers: Vec<AnswerSummary>,
}

/// Analyze a stored question.
pub fn question_quality(question: &Question, thresholds: &Thresholds) -> QuestionQuality {
    let analysis = analyze_answers(&question.records(), thresholds);

    let answers = question
        .answers
        .iter()
        .map(|a| AnswerSummary {
            id: a.id.clone(),
            text_preview: preview(&a.record.text, 50),
            length: a.record.len(),
            is_correct: a.record.is_correct,
            has_distractor_reason: a
                .record
                .distractor_reason
                .as_deref()
                .is_some_and(|r| !r.is_empty()),
        })
        .collect();

    QuestionQuality {
        question_id: question.id.clone(),
        question_preview: question.preview(100),
        analysis,
        answers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerOption;
    use crate::rules::BiasIssueType;

    fn balanced() -> Vec<AnswerRecord> {
        vec![
            AnswerRecord::correct("Use Amazon S3 for object storage"),
            AnswerRecord::distractor("Use Amazon EBS for block storage")
                .with_reason("EBS is for EC2 volumes"),
            AnswerRecord::distractor("Use Amazon EFS for file storage")
                .with_reason("EFS is for shared files"),
            AnswerRecord::distractor("Use Amazon FSx for Windows files")
                .with_reason("FSx is for Windows"),
        ]
    }

    #[test]
    fn balanced_answers_pass() {
        let result = analyze_answers(&balanced(), &Thresholds::default());
        assert!(result.is_valid);
        assert!(result.issues.is_empty());
        assert!(matches!(result.quality_grade, Grade::A | Grade::B));
    }

    #[test]
    fn correct_answer_too_long_fails() {
        let answers = vec![
            AnswerRecord::correct(
                "This is a very long and detailed correct answer that provides extensive information and context about the topic at hand, explaining multiple aspects and considerations",
            ),
            AnswerRecord::distractor("Short A"),
            AnswerRecord::distractor("Short B"),
            AnswerRecord::distractor("Short C"),
        ];
        let result = analyze_answers(&answers, &Thresholds::default());
        assert!(!result.is_valid);
        assert!(result
            .issues
            .iter()
            .any(|i| i.issue_type == BiasIssueType::CorrectTooLong));
        assert!(matches!(result.quality_grade, Grade::D | Grade::F));
    }

    #[test]
    fn empty_answers_are_sentinel() {
        let result = analyze_answers(&[], &Thresholds::default());
        let metrics = result.metrics.unwrap();
        assert_eq!(metrics.mean_length, 0.0);
        assert_eq!(metrics.correct_distractor_ratio, 1.0);
        assert!(result.issues.is_empty());
        assert!(result.is_valid);
    }

    #[test]
    fn warnings_do_not_affect_validity() {
        let answers = vec![
            AnswerRecord::correct("Use Amazon S3 for storage"),
            AnswerRecord::distractor("Use Amazon EBS for storage").with_reason("short"),
        ];
        let result = analyze_answers(&answers, &Thresholds::default());
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.quality_score < 1.0);
    }

    #[test]
    fn analysis_is_deterministic() {
        let t = Thresholds::default();
        let first = analyze_answers(&balanced(), &t);
        let second = analyze_answers(&balanced(), &t);
        assert_eq!(first, second);
        assert_eq!(
            first.quality_score.to_bits(),
            second.quality_score.to_bits()
        );
    }

    #[test]
    fn single_requires_exactly_one_correct() {
        let answers = vec![
            AnswerRecord::correct("Use Amazon S3 for storage"),
            AnswerRecord::correct("Use Amazon EBS for storage"),
        ];
        let err = validate_structure(QuestionType::Single, &answers, None).unwrap_err();
        assert_eq!(err, StructureError::WrongCorrectCount { found: 2 });
    }

    #[test]
    fn choose_n_rules() {
        let answers = vec![
            AnswerRecord::correct("Enable versioning on the bucket"),
            AnswerRecord::correct("Enable MFA delete on the bucket"),
            AnswerRecord::distractor("Enable transfer acceleration"),
        ];
        assert_eq!(
            validate_structure(QuestionType::ChooseN, &answers, None),
            Err(StructureError::MissingChooseN)
        );
        assert_eq!(
            validate_structure(QuestionType::ChooseN, &answers, Some(1)),
            Err(StructureError::ChooseNMismatch {
                expected: 1,
                found: 2
            })
        );
        assert!(validate_structure(QuestionType::ChooseN, &answers, Some(2)).is_ok());

        let all_correct: Vec<_> = answers
            .iter()
            .map(|a| AnswerRecord {
                is_correct: true,
                ..a.clone()
            })
            .collect();
        assert_eq!(
            validate_structure(QuestionType::ChooseN, &all_correct, Some(3)),
            Err(StructureError::ChooseNTooLarge {
                choose_n: 3,
                total: 3
            })
        );
    }

    #[test]
    fn select_all_needs_a_correct_answer() {
        let answers = vec![
            AnswerRecord::distractor("Use Amazon S3 for storage"),
            AnswerRecord::distractor("Use Amazon EBS for storage"),
        ];
        assert_eq!(
            validate_structure(QuestionType::SelectAll, &answers, None),
            Err(StructureError::NoCorrectAnswer)
        );
    }

    #[test]
    fn structural_failure_short_circuits() {
        let answers = vec![AnswerRecord::correct("OK")];
        let result = analyze_proposed(QuestionType::Single, None, &answers, &Thresholds::default());
        assert_eq!(result, Err(StructureError::TooFewAnswers { found: 1 }));
    }

    #[test]
    fn proposed_answers_analyzed_when_structure_is_fine() {
        let result =
            analyze_proposed(QuestionType::Single, None, &balanced(), &Thresholds::default())
                .unwrap();
        assert!(result.is_valid);
    }

    #[test]
    fn question_quality_keeps_answer_ids() {
        let question = Question {
            id: "q1".into(),
            text: "Which service provides object storage?".into(),
            question_type: QuestionType::Single,
            choose_n: None,
            answers: balanced()
                .into_iter()
                .enumerate()
                .map(|(i, record)| AnswerOption {
                    id: format!("ans-{i}"),
                    record,
                })
                .collect(),
        };
        let quality = question_quality(&question, &Thresholds::default());
        assert_eq!(quality.question_id, "q1");
        assert_eq!(quality.answers.len(), 4);
        assert_eq!(quality.answers[2].id, "ans-2");
        assert!(!quality.answers[0].has_distractor_reason);
        assert!(quality.answers[1].has_distractor_reason);
        assert_eq!(quality.answers[0].length, 32);
    }

    #[test]
    fn question_quality_json_keeps_exact_ratio() {
        let mut records = vec![AnswerRecord::correct("c".repeat(216))];
        records.extend((0..3).map(|_| AnswerRecord::distractor("d".repeat(10))));
        let question = Question {
            id: "lopsided".into(),
            text: "Which answer gives itself away?".into(),
            question_type: QuestionType::Single,
            choose_n: None,
            answers: records
                .into_iter()
                .enumerate()
                .map(|(i, record)| AnswerOption {
                    id: format!("ans-{i}"),
                    record,
                })
                .collect(),
        };
        let quality = question_quality(&question, &Thresholds::default());

        let json = serde_json::to_string(&quality).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["analysis"]["metrics"]["correct_distractor_ratio"],
            21.6
        );

        let back: QuestionQuality = serde_json::from_str(&json).unwrap();
        assert_eq!(back, quality);
    }
}
