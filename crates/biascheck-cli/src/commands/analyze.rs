//! The `biascheck analyze` command.

use std::path::PathBuf;

use anyhow::Result;

use biascheck_core::config::load_config_from;
use biascheck_core::diagnostics::format_bias_failure;
use biascheck_core::model::QuestionType;
use biascheck_core::parser::parse_answer_set;
use biascheck_core::rules::BiasIssue;
use biascheck_core::{analyze_proposed, BiasAnalysisResult};

pub fn execute(
    answers_path: PathBuf,
    question_type: QuestionType,
    choose_n: Option<usize>,
    format: String,
    strict: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let answers = parse_answer_set(&answers_path)?;

    let result = analyze_proposed(question_type, choose_n, &answers, &config.thresholds)?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => print_text(&result),
    }

    if strict && !result.is_valid {
        std::process::exit(1);
    }

    Ok(())
}

fn print_text(result: &BiasAnalysisResult) {
    println!(
        "Quality: {} ({:.1}%)",
        result.quality_grade,
        result.quality_score * 100.0
    );

    if result.is_valid {
        println!("Answer set passed.");
        if !result.warnings.is_empty() {
            println!("\nWarnings:");
            print_issues(&result.warnings);
        }
    } else {
        println!("\n{}", format_bias_failure(result));
    }
}

fn print_issues(issues: &[BiasIssue]) {
    for issue in issues {
        println!("  - [{}] {}", issue.issue_type, issue.message);
    }
}
