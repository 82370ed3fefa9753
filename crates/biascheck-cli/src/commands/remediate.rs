//! The `biascheck remediate` command.

use std::path::PathBuf;

use anyhow::Result;

use biascheck_core::batch::{remediation_plan, GradeFloor, RemediationPlan};
use biascheck_core::config::load_config_from;
use biascheck_core::parser::load_banks;

pub fn execute(
    bank_path: PathBuf,
    min_grade: Option<GradeFloor>,
    limit: Option<usize>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let floor = match min_grade {
        Some(floor) => floor,
        None => GradeFloor::try_from(config.default_min_grade).map_err(anyhow::Error::msg)?,
    };
    let limit = limit.unwrap_or(config.default_limit);

    let plans: Vec<RemediationPlan> = load_banks(&bank_path)?
        .iter()
        .map(|bank| remediation_plan(bank, &config.thresholds, floor, limit))
        .collect();

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    for plan in &plans {
        print_plan(plan);
    }

    Ok(())
}

fn print_plan(plan: &RemediationPlan) {
    println!(
        "{}: {} of {} questions below grade {} (showing {})",
        plan.exam_name, plan.biased_count, plan.total_questions, plan.grade_floor, plan.returned_count
    );

    for q in &plan.questions {
        println!(
            "\n[{}] {} ({:.1}%) target {} chars",
            q.question_id,
            q.quality_grade,
            q.quality_score * 100.0,
            q.target_length
        );
        println!("  {}", q.primary_issue);
        for a in &q.answers {
            println!(
                "  {} {:<12} {:>4} chars  {}",
                if a.is_correct { "*" } else { " " },
                a.answer_id,
                a.current_length,
                a.instruction
            );
        }
    }

    if !plan.questions.is_empty() {
        println!("\n{}", plan.usage_hint);
    }
}
