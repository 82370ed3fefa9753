//! The `biascheck exam` command.

use std::path::PathBuf;

use anyhow::Result;

use biascheck_core::batch::{analyze_exam, remediation_plan, GradeFloor};
use biascheck_core::config::load_config_from;
use biascheck_core::parser::load_banks;
use biascheck_core::report::BiasReport;
use biascheck_report::html::write_html_report;
use biascheck_report::sarif::write_sarif_report;

pub fn execute(
    bank_path: PathBuf,
    breakdown: bool,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
    fail_on_failing: bool,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let floor = GradeFloor::try_from(config.default_min_grade).map_err(anyhow::Error::msg)?;

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html", "sarif", "markdown"]
    } else {
        format.split(',').map(str::trim).collect()
    };
    // SARIF results come from the per-question breakdown.
    let breakdown = breakdown || formats.contains(&"sarif");

    let banks = load_banks(&bank_path)?;
    anyhow::ensure!(!banks.is_empty(), "no question banks found in {}", bank_path.display());

    let mut failing_banks = Vec::new();
    for bank in &banks {
        eprintln!(
            "biascheck v{} - Analyzing {} questions in {}",
            env!("CARGO_PKG_VERSION"),
            bank.questions.len(),
            bank.name
        );

        let exam = analyze_exam(bank, &config.thresholds, breakdown);
        let plan = remediation_plan(bank, &config.thresholds, floor, config.default_limit);
        let report = BiasReport::new(config.thresholds.clone(), exam, Some(plan));

        print_summary(&report);

        std::fs::create_dir_all(&output)?;
        let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
        let stem = format!("{}-{timestamp}", bank.id);

        for fmt in &formats {
            match *fmt {
                "json" => {
                    let path = output.join(format!("{stem}.json"));
                    report.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("{stem}.html"));
                    write_html_report(&report, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
                "sarif" => {
                    let path = output.join(format!("{stem}.sarif"));
                    write_sarif_report(&report, &path)?;
                    eprintln!("SARIF report: {}", path.display());
                }
                "markdown" | "md" => {
                    let path = output.join(format!("{stem}.md"));
                    std::fs::write(&path, report.to_markdown())?;
                    eprintln!("Markdown report: {}", path.display());
                }
                _ => {
                    eprintln!("Unknown format: {fmt}");
                }
            }
        }

        if report.has_failing_questions() {
            failing_banks.push(bank.id.clone());
        }
    }

    if fail_on_failing && !failing_banks.is_empty() {
        eprintln!(
            "\nFailing questions (grade D or F) in: {}",
            failing_banks.join(", ")
        );
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(report: &BiasReport) {
    use comfy_table::{Cell, Table};

    let exam = &report.exam;
    let total = exam.total_questions.max(1) as f64;

    let mut table = Table::new();
    table.set_header(vec!["Grade", "Questions", "Share"]);
    for (grade, count) in exam.grade_distribution.iter() {
        table.add_row(vec![
            Cell::new(grade),
            Cell::new(count),
            Cell::new(format!("{:.1}%", count as f64 / total * 100.0)),
        ]);
    }

    eprintln!("\n{table}");
    eprintln!(
        "Average quality: {:.1}% across {} questions",
        exam.average_quality_score * 100.0,
        exam.total_questions
    );

    if !exam.worst_offenders.is_empty() {
        let mut offenders = Table::new();
        offenders.set_header(vec!["Question", "Score", "Grade", "First issue"]);
        for o in &exam.worst_offenders {
            offenders.add_row(vec![
                Cell::new(&o.question_id),
                Cell::new(format!("{:.1}%", o.quality_score * 100.0)),
                Cell::new(o.quality_grade),
                Cell::new(o.issues.first().map(String::as_str).unwrap_or("-")),
            ]);
        }
        eprintln!("\nWorst offenders:\n{offenders}");
    }

    for rec in &exam.recommendations {
        eprintln!("  * {rec}");
    }
}
