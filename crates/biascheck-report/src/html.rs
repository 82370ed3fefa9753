//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use biascheck_core::batch::GradeDistribution;
use biascheck_core::model::Grade;
use biascheck_core::report::BiasReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn grade_class(grade: Grade) -> &'static str {
    match grade {
        Grade::A | Grade::B => "pass",
        Grade::C => "warn",
        Grade::D | Grade::F => "fail",
    }
}

/// Generate an HTML report from a bias report.
pub fn generate_html(report: &BiasReport) -> String {
    let exam = &report.exam;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>biascheck report - {}</title>\n",
        html_escape(&exam.exam_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>biascheck report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Exam: <strong>{}</strong> | {} questions | average quality {:.1}% | {}</p>\n",
        html_escape(&exam.exam_name),
        exam.total_questions,
        exam.average_quality_score * 100.0,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Grade distribution
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Grade distribution</h2>\n");
    html.push_str(&generate_grade_chart(&exam.grade_distribution));

    if !exam.recommendations.is_empty() {
        html.push_str("<ul class=\"recommendations\">\n");
        for rec in &exam.recommendations {
            html.push_str(&format!("<li>{}</li>\n", html_escape(rec)));
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n");

    // Worst offenders
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Worst offenders</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"offenders\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable('offenders', 0)\">Question</th><th onclick=\"sortTable('offenders', 1)\">Preview</th><th onclick=\"sortTable('offenders', 2)\">Score</th><th onclick=\"sortTable('offenders', 3)\">Grade</th><th>Issues</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for o in &exam.worst_offenders {
        let issues = o
            .issues
            .iter()
            .map(|i| html_escape(i))
            .collect::<Vec<_>>()
            .join("<br>");
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{:.1}%</td><td class=\"{}\">{}</td><td>{}</td></tr>\n",
            html_escape(&o.question_id),
            html_escape(&o.question_preview),
            o.quality_score * 100.0,
            grade_class(o.quality_grade),
            o.quality_grade,
            issues
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Remediation
    if let Some(plan) = &report.remediation {
        html.push_str("<section class=\"remediation\">\n");
        html.push_str(&format!(
            "<h2>Remediation ({} of {} questions below grade {})</h2>\n",
            plan.returned_count, plan.biased_count, plan.grade_floor
        ));
        html.push_str("<table class=\"results-table\">\n");
        html.push_str("<thead><tr><th>Question</th><th>Answer</th><th>Correct</th><th>Length</th><th>Target</th><th>Action</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for q in &plan.questions {
            for a in &q.answers {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    html_escape(&q.question_id),
                    html_escape(&a.answer_id),
                    if a.is_correct { "yes" } else { "" },
                    a.current_length,
                    q.target_length,
                    a.instruction
                ));
            }
        }
        html.push_str("</tbody></table>\n");
        html.push_str(&format!("<p class=\"meta\">{}</p>\n", html_escape(&plan.usage_hint)));
        html.push_str("</section>\n");
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &BiasReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn generate_grade_chart(distribution: &GradeDistribution) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 40;

    let total = distribution.total().max(1);
    let rows: Vec<(Grade, usize)> = distribution.iter().collect();
    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 80,
        total_height
    );

    for (i, (grade, count)) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let share = *count as f64 / total as f64;
        let width = (share * max_width as f64) as usize;

        let color = match grade {
            Grade::A | Grade::B => "#22c55e",
            Grade::C => "#eab308",
            Grade::D | Grade::F => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            grade
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{} ({:.1}%)</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            count,
            share * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --warn: #fef9c3; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --warn: #713f12; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.warn { background: var(--warn); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(id, col) {
  const table = document.getElementById(id);
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, { numeric: true }) : vb.localeCompare(va, undefined, { numeric: true });
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;

    #[test]
    fn html_report_contains_required_elements() {
        let report = sample_report();
        let html = generate_html(&report);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<svg"));
        assert!(html.contains("lopsided"));
        assert!(html.contains("SHORTEN by ~120 chars"));
        assert!(html.contains("Raw JSON Data"));
    }

    #[test]
    fn html_escapes_user_text() {
        let html = generate_html(&sample_report());
        assert!(html.contains("Storage &amp; Databases"));
        assert!(html.contains("Question &lt;lopsided&gt;"));
        assert!(!html.contains("Question <lopsided>"));
    }

    #[test]
    fn grade_chart_has_a_bar_per_grade() {
        let report = sample_report();
        let svg = generate_grade_chart(&report.exam.grade_distribution);
        assert_eq!(svg.matches("<rect").count(), 5);
    }

    #[test]
    fn html_report_write_to_file() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
