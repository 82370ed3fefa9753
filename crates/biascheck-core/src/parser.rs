//! TOML question bank parser.
//!
//! Loads exam banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::analysis::validate_structure;
use crate::model::{AnswerOption, AnswerRecord, ExamBank, Question, QuestionType};

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    exam: TomlExamHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlExamHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    text: String,
    #[serde(default = "default_type_str", rename = "type")]
    question_type: String,
    #[serde(default)]
    choose_n: Option<usize>,
    #[serde(default)]
    answers: Vec<TomlAnswer>,
}

fn default_type_str() -> String {
    "single".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlAnswer {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    correct: bool,
    #[serde(default)]
    distractor_reason: Option<String>,
}

/// Parse a single TOML file into an `ExamBank`.
pub fn parse_exam_bank(path: &Path) -> Result<ExamBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;

    parse_exam_bank_str(&content, path)
}

/// Parse a TOML string into an `ExamBank` (useful for testing).
pub fn parse_exam_bank_str(content: &str, source_path: &Path) -> Result<ExamBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let question_type: QuestionType = q
                .question_type
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {}: {}", q.id, e))?;

            let answers = q
                .answers
                .into_iter()
                .enumerate()
                .map(|(i, a)| AnswerOption {
                    id: a.id.unwrap_or_else(|| format!("{}-{}", q.id, i + 1)),
                    record: AnswerRecord {
                        text: a.text,
                        is_correct: a.correct,
                        distractor_reason: a.distractor_reason,
                    },
                })
                .collect();

            Ok(Question {
                id: q.id,
                text: q.text,
                question_type,
                choose_n: q.choose_n,
                answers,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ExamBank {
        id: parsed.exam.id,
        name: parsed.exam.name,
        description: parsed.exam.description,
        questions,
    })
}

/// Recursively load all `.toml` bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<ExamBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_exam_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a bank file, or every bank under a directory.
pub fn load_banks(path: &Path) -> Result<Vec<ExamBank>> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        Ok(vec![parse_exam_bank(path)?])
    }
}

/// Parse a proposed answer set from a JSON array of answer records.
pub fn parse_answer_set(path: &Path) -> Result<Vec<AnswerRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers JSON: {}", path.display()))
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate an exam bank for structural problems.
pub fn validate_exam_bank(bank: &ExamBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for question in &bank.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    let mut seen_answer_ids = HashSet::new();
    for question in &bank.questions {
        for answer in &question.answers {
            if !seen_answer_ids.insert(&answer.id) {
                warnings.push(ValidationWarning {
                    question_id: Some(question.id.clone()),
                    message: format!("duplicate answer ID: {}", answer.id),
                });
            }
        }
    }

    for question in &bank.questions {
        if question.text.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "question text is empty".into(),
            });
        }

        for (i, answer) in question.answers.iter().enumerate() {
            if answer.record.text.trim().is_empty() {
                warnings.push(ValidationWarning {
                    question_id: Some(question.id.clone()),
                    message: format!("answer {} text is empty", i + 1),
                });
            }
        }

        if let Err(e) =
            validate_structure(question.question_type, &question.records(), question.choose_n)
        {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: e.to_string(),
            });
        }
    }

    warnings
}
