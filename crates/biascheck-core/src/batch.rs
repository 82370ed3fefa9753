//! Exam-wide bias reporting and remediation planning.
//!
//! Every question is analyzed independently; results are folded in input
//! order so ties always resolve the same way.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::{analyze_answers, BiasAnalysisResult};
use crate::config::Thresholds;
use crate::model::{char_len, ExamBank, Grade, Question};
use crate::rules::{BiasIssueType, Severity};

/// Maximum number of worst offenders kept in a report.
pub const MAX_WORST_OFFENDERS: usize = 10;
/// Issue messages kept per worst offender.
pub const ISSUES_PER_OFFENDER: usize = 3;
/// Average score below which the exam as a whole is flagged.
pub const TARGET_AVERAGE_SCORE: f64 = 0.7;
/// Answers within this fraction of the target length need no change.
pub const LENGTH_TOLERANCE: f64 = 0.2;
/// Upper bound on questions returned by a remediation plan.
pub const MAX_REMEDIATION_LIMIT: usize = 100;

const USAGE_HINT: &str = "For each question, rewrite answers to match target_length, then update the answers with the new text.";

/// Count of questions per grade, always holding all five grades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeDistribution(BTreeMap<Grade, usize>);

impl GradeDistribution {
    pub fn new() -> Self {
        Self(Grade::ALL.iter().map(|&g| (g, 0)).collect())
    }

    pub fn record(&mut self, grade: Grade) {
        *self.0.entry(grade).or_insert(0) += 1;
    }

    pub fn count(&self, grade: Grade) -> usize {
        self.0.get(&grade).copied().unwrap_or(0)
    }

    /// `(grade, count)` pairs from A to F.
    pub fn iter(&self) -> impl Iterator<Item = (Grade, usize)> + '_ {
        self.0.iter().map(|(&g, &c)| (g, c))
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }
}

impl Default for GradeDistribution {
    fn default() -> Self {
        Self::new()
    }
}

/// A low-scoring question surfaced for prioritized remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorstOffender {
    pub question_id: String,
    pub question_preview: String,
    pub quality_score: f64,
    pub quality_grade: Grade,
    /// The first few issue messages, in rule order.
    pub issues: Vec<String>,
}

/// Compact view of one issue in a breakdown row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSummary {
    #[serde(rename = "type")]
    pub issue_type: BiasIssueType,
    pub severity: Severity,
    pub message: String,
}

/// Per-question row of an exam report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSummary {
    pub question_id: String,
    pub quality_score: f64,
    pub quality_grade: Grade,
    pub issue_count: usize,
    /// Issues followed by warnings.
    pub issues: Vec<IssueSummary>,
}

/// Aggregate bias report for one exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamBiasReport {
    pub exam_id: String,
    pub exam_name: String,
    pub total_questions: usize,
    /// Rounded to three decimals.
    pub average_quality_score: f64,
    pub grade_distribution: GradeDistribution,
    pub worst_offenders: Vec<WorstOffender>,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_breakdown: Option<Vec<QuestionSummary>>,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn summarize(question: &Question, analysis: &BiasAnalysisResult) -> QuestionSummary {
    let issues = analysis
        .issues
        .iter()
        .chain(&analysis.warnings)
        .map(|i| IssueSummary {
            issue_type: i.issue_type,
            severity: i.severity,
            message: i.message.clone(),
        })
        .collect();

    QuestionSummary {
        question_id: question.id.clone(),
        quality_score: analysis.quality_score,
        quality_grade: analysis.quality_grade,
        issue_count: analysis.issues.len(),
        issues,
    }
}

fn recommendations(distribution: &GradeDistribution, average: f64) -> Vec<String> {
    let mut recs = Vec::new();
    let failing = distribution.count(Grade::F);
    if failing > 0 {
        recs.push(format!(
            "{failing} questions have failing grades and need immediate attention."
        ));
    }
    let poor = distribution.count(Grade::D);
    if poor > 0 {
        recs.push(format!("{poor} questions have D grades and should be reviewed."));
    }
    if average < TARGET_AVERAGE_SCORE {
        recs.push(
            "Overall quality is below target. Consider reviewing answer length balance.".into(),
        );
    }
    recs
}

/// Analyze every question of an exam and fold the results.
pub fn analyze_exam(
    exam: &ExamBank,
    thresholds: &Thresholds,
    include_breakdown: bool,
) -> ExamBiasReport {
    if exam.questions.is_empty() {
        return ExamBiasReport {
            exam_id: exam.id.clone(),
            exam_name: exam.name.clone(),
            total_questions: 0,
            average_quality_score: 0.0,
            grade_distribution: GradeDistribution::new(),
            worst_offenders: Vec::new(),
            recommendations: vec!["No questions found for this exam.".into()],
            question_breakdown: include_breakdown.then(Vec::new),
        };
    }

    let mut distribution = GradeDistribution::new();
    let mut total_score = 0.0;
    let mut offenders = Vec::new();
    let mut breakdown = Vec::with_capacity(exam.questions.len());

    for question in &exam.questions {
        let analysis = analyze_answers(&question.records(), thresholds);
        tracing::debug!(
            question = %question.id,
            score = analysis.quality_score,
            grade = %analysis.quality_grade,
            "analyzed question"
        );

        total_score += analysis.quality_score;
        distribution.record(analysis.quality_grade);

        if analysis.quality_grade.is_failing() {
            offenders.push(WorstOffender {
                question_id: question.id.clone(),
                question_preview: question.preview(80),
                quality_score: analysis.quality_score,
                quality_grade: analysis.quality_grade,
                issues: analysis
                    .issues
                    .iter()
                    .take(ISSUES_PER_OFFENDER)
                    .map(|i| i.message.clone())
                    .collect(),
            });
        }

        if include_breakdown {
            breakdown.push(summarize(question, &analysis));
        }
    }

    // Stable sort keeps input order among equal scores.
    offenders.sort_by(|a, b| a.quality_score.total_cmp(&b.quality_score));
    offenders.truncate(MAX_WORST_OFFENDERS);

    let average = total_score / exam.questions.len() as f64;
    tracing::info!(
        exam = %exam.id,
        questions = exam.questions.len(),
        average,
        "exam analysis complete"
    );

    ExamBiasReport {
        exam_id: exam.id.clone(),
        exam_name: exam.name.clone(),
        total_questions: exam.questions.len(),
        average_quality_score: round_to(average, 3),
        recommendations: recommendations(&distribution, average),
        grade_distribution: distribution,
        worst_offenders: offenders,
        question_breakdown: include_breakdown.then_some(breakdown),
    }
}

/// The grade at or below which a question is pulled into a remediation plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradeFloor {
    F,
    #[default]
    D,
    C,
}

impl GradeFloor {
    /// Questions scoring below this value are included.
    pub fn score_cutoff(self) -> f64 {
        match self {
            GradeFloor::F => 0.6,
            GradeFloor::D => 0.7,
            GradeFloor::C => 0.8,
        }
    }
}

impl fmt::Display for GradeFloor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradeFloor::F => write!(f, "F"),
            GradeFloor::D => write!(f, "D"),
            GradeFloor::C => write!(f, "C"),
        }
    }
}

impl FromStr for GradeFloor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "F" => Ok(GradeFloor::F),
            "D" => Ok(GradeFloor::D),
            "C" => Ok(GradeFloor::C),
            other => Err(format!("grade floor must be F, D or C, got: {other}")),
        }
    }
}

impl TryFrom<Grade> for GradeFloor {
    type Error = String;

    fn try_from(grade: Grade) -> Result<Self, Self::Error> {
        grade.to_string().parse()
    }
}

/// What to do with one answer to balance its question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "chars", rename_all = "snake_case")]
pub enum LengthInstruction {
    WithinRange,
    Shorten(usize),
    Expand(usize),
}

impl LengthInstruction {
    /// Instruction for an answer of `length` chars against `target`.
    pub fn for_length(length: usize, target: usize) -> Self {
        let diff = length as i64 - target as i64;
        if diff.unsigned_abs() as f64 <= target as f64 * LENGTH_TOLERANCE {
            LengthInstruction::WithinRange
        } else if diff > 0 {
            LengthInstruction::Shorten(diff.unsigned_abs() as usize)
        } else {
            LengthInstruction::Expand(diff.unsigned_abs() as usize)
        }
    }
}

impl fmt::Display for LengthInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthInstruction::WithinRange => write!(f, "OK - within range"),
            LengthInstruction::Shorten(n) => write!(f, "SHORTEN by ~{n} chars"),
            LengthInstruction::Expand(n) => write!(f, "EXPAND by ~{n} chars"),
        }
    }
}

/// Fix instruction for one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerInstruction {
    pub answer_id: String,
    pub text: String,
    pub is_correct: bool,
    pub current_length: usize,
    pub instruction: LengthInstruction,
    /// `instruction` rendered for authors, e.g. `SHORTEN by ~120 chars`.
    pub instruction_text: String,
}

/// A question selected for remediation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasedQuestion {
    pub question_id: String,
    pub question_text: String,
    /// Rounded to three decimals.
    pub quality_score: f64,
    pub quality_grade: Grade,
    pub target_length: usize,
    /// Rounded to two decimals.
    pub correct_to_distractor_ratio: Option<f64>,
    pub answers: Vec<AnswerInstruction>,
    pub primary_issue: String,
}

/// Questions needing fixes, worst first, with per-answer instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemediationPlan {
    pub exam_id: String,
    pub exam_name: String,
    pub grade_floor: GradeFloor,
    pub total_questions: usize,
    pub biased_count: usize,
    pub returned_count: usize,
    pub questions: Vec<BiasedQuestion>,
    pub usage_hint: String,
}

/// Integer mean of the answer lengths; the length every answer should aim for.
pub fn balanced_target_length(question: &Question) -> usize {
    if question.answers.is_empty() {
        return 0;
    }
    let total: usize = question.answers.iter().map(|a| a.record.len()).sum();
    total / question.answers.len()
}

/// Length instructions for every answer of `question`.
pub fn answer_instructions(question: &Question) -> Vec<AnswerInstruction> {
    let target = balanced_target_length(question);
    question
        .answers
        .iter()
        .map(|a| {
            let current_length = char_len(&a.record.text);
            let instruction = LengthInstruction::for_length(current_length, target);
            AnswerInstruction {
                answer_id: a.id.clone(),
                text: a.record.text.clone(),
                is_correct: a.record.is_correct,
                current_length,
                instruction_text: instruction.to_string(),
                instruction,
            }
        })
        .collect()
}

/// Select questions scoring below `floor` and tell the author how to
/// rebalance each answer. `limit` is clamped to `1..=100`.
///
/// Questions are scored on the full answer records, so distractor-reason
/// warnings count toward the score and can pull a question below the floor.
/// A question's score here always equals its score in [`analyze_exam`].
pub fn remediation_plan(
    exam: &ExamBank,
    thresholds: &Thresholds,
    floor: GradeFloor,
    limit: usize,
) -> RemediationPlan {
    let cutoff = floor.score_cutoff();
    let limit = limit.clamp(1, MAX_REMEDIATION_LIMIT);

    let mut scored: Vec<(f64, BiasedQuestion)> = exam
        .questions
        .iter()
        .filter_map(|question| {
            let analysis = analyze_answers(&question.records(), thresholds);
            if analysis.quality_score >= cutoff {
                return None;
            }

            let biased = BiasedQuestion {
                question_id: question.id.clone(),
                question_text: question.text.clone(),
                quality_score: round_to(analysis.quality_score, 3),
                quality_grade: analysis.quality_grade,
                target_length: balanced_target_length(question),
                correct_to_distractor_ratio: analysis
                    .metrics
                    .as_ref()
                    .map(|m| round_to(m.correct_distractor_ratio, 2)),
                answers: answer_instructions(question),
                primary_issue: analysis
                    .issues
                    .first()
                    .map(|i| i.message.clone())
                    .unwrap_or_else(|| "Length imbalance".into()),
            };
            Some((analysis.quality_score, biased))
        })
        .collect();

    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    let biased_count = scored.len();
    let questions: Vec<BiasedQuestion> = scored
        .into_iter()
        .take(limit)
        .map(|(_, q)| q)
        .collect();

    tracing::info!(
        exam = %exam.id,
        floor = %floor,
        biased = biased_count,
        "remediation plan built"
    );

    RemediationPlan {
        exam_id: exam.id.clone(),
        exam_name: exam.name.clone(),
        grade_floor: floor,
        total_questions: exam.questions.len(),
        biased_count,
        returned_count: questions.len(),
        questions,
        usage_hint: USAGE_HINT.into(),
    }
}
