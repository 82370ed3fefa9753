//! The `biascheck guidelines` command.

use std::path::PathBuf;

use anyhow::Result;

use biascheck_core::config::load_config_from;
use biascheck_core::guidance::{answer_guidelines, QuestionShape};
use biascheck_core::model::QuestionType;

pub fn execute(
    question_type: QuestionType,
    num_answers: usize,
    target_length: Option<usize>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(num_answers >= 2, "num-answers must be at least 2");

    let config = load_config_from(config_path.as_deref())?;
    let shape = QuestionShape {
        question_type,
        num_answers,
        target_length,
    };
    let g = answer_guidelines(&shape, &config.thresholds);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&g)?);
        return Ok(());
    }

    println!(
        "Guidelines for a {} question with {} answers",
        g.question_type, g.num_answers
    );
    println!(
        "  Target length: {} chars (acceptable {}-{})",
        g.target_length, g.min_length, g.max_length
    );

    println!("\nConstraints:");
    println!("  - {}", g.constraints.all_answers_similar_length);
    println!("  - {}", g.constraints.correct_not_longer);
    println!("  - {}", g.constraints.distractors_plausible);

    println!("\nAvoid:");
    for p in &g.anti_patterns {
        println!("  - {p}");
    }

    println!("\nTips:");
    for t in &g.tips {
        println!("  - {t}");
    }

    Ok(())
}
