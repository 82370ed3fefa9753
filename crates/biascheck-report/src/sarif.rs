//! SARIF (Static Analysis Results Interchange Format) output.
//!
//! Generates SARIF 2.1.0 documents for GitHub Code Scanning integration.

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use biascheck_core::report::BiasReport;
use biascheck_core::rules::{BiasIssueType, Severity};

/// Generate a SARIF 2.1.0 JSON document from a bias report.
///
/// Results come from the per-question breakdown, so a report saved without
/// one produces an empty result list.
pub fn generate_sarif(report: &BiasReport) -> serde_json::Value {
    let rules: Vec<_> = BiasIssueType::ALL
        .iter()
        .map(|t| {
            json!({
                "id": t.as_str(),
                "name": t.as_str(),
                "shortDescription": { "text": t.description() },
            })
        })
        .collect();

    let mut results = Vec::new();

    for question in report.exam.question_breakdown.iter().flatten() {
        let location = json!({
            "physicalLocation": {
                "artifactLocation": {
                    "uri": format!("questions/{}", question.question_id)
                }
            }
        });

        for issue in &question.issues {
            let level = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            results.push(json!({
                "ruleId": issue.issue_type.as_str(),
                "level": level,
                "message": { "text": format!("{}: {}", question.question_id, issue.message) },
                "locations": [location.clone()]
            }));
        }
    }

    json!({
        "$schema": "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/main/sarif-2.1/schema/sarif-schema-2.1.0.json",
        "version": "2.1.0",
        "runs": [{
            "tool": {
                "driver": {
                    "name": "biascheck",
                    "version": env!("CARGO_PKG_VERSION"),
                    "informationUri": "https://github.com/MysterionRise/biascheck",
                    "rules": rules
                }
            },
            "results": results
        }]
    })
}

/// Write a SARIF report to a file.
pub fn write_sarif_report(report: &BiasReport, path: &Path) -> Result<()> {
    let sarif = generate_sarif(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(&sarif)?;
    std::fs::write(path, json)?;
    Ok(())
}
