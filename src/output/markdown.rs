use super::{savings_line, ReportOptions};
use crate::core::{AnalysisResult, Finding, Priority};
use std::fmt::Write;

pub fn render_markdown(result: &AnalysisResult, options: &ReportOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# CircleCI Optimization Report");
    let _ = writeln!(out);

    if result.is_empty() {
        let _ = writeln!(out, "No optimization opportunities found.");
        append_faults(&mut out, result);
        return out;
    }

    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Metric | Value |");
    let _ = writeln!(out, "|--------|-------|");
    let _ = writeln!(out, "| Total findings | {} |", result.total_findings);
    for priority in Priority::ALL {
        let _ = writeln!(out, "| {priority} priority | {} |", result.counts.get(priority));
    }
    let _ = writeln!(
        out,
        "| Estimated cost reduction | {}% |",
        result.estimated_savings.cost_reduction_percent
    );
    let _ = writeln!(
        out,
        "| Estimated time saved | {} min |",
        result.estimated_savings.time_saved
    );
    let _ = writeln!(out);

    for (priority, findings) in options.groups(result) {
        let _ = writeln!(out, "## {priority} Priority");
        let _ = writeln!(out);
        for finding in findings {
            append_finding(&mut out, finding);
        }
    }

    append_faults(&mut out, result);
    out
}

fn append_finding(out: &mut String, finding: &Finding) {
    let _ = writeln!(out, "### {}", finding.title);
    let _ = writeln!(out);
    let _ = writeln!(out, "- **Id:** `{}`", finding.id);
    let _ = writeln!(out, "- **Category:** {}", finding.category.display_name());
    let _ = writeln!(out, "- **Problem:** {}", finding.problem);
    if !finding.current_state.is_empty() {
        let _ = writeln!(out, "- **Current state:** {}", finding.current_state);
    }
    let _ = writeln!(out, "- **Recommendation:** {}", finding.recommendation);
    if let Some(savings) = savings_line(finding) {
        let _ = writeln!(out, "- **Estimated savings:** {savings}");
    }
    if !finding.affected_jobs.is_empty() {
        let jobs: Vec<String> = finding
            .affected_jobs
            .iter()
            .map(|job| format!("`{job}`"))
            .collect();
        let _ = writeln!(out, "- **Affected jobs:** {}", jobs.join(", "));
    }
    if let Some(example) = &finding.example {
        let _ = writeln!(out);
        let _ = writeln!(out, "```yaml");
        let _ = writeln!(out, "{}", example.trim_end());
        let _ = writeln!(out, "```");
    }
    let _ = writeln!(out);
}

fn append_faults(out: &mut String, result: &AnalysisResult) {
    if result.analyzer_faults.is_empty() {
        return;
    }
    let _ = writeln!(out, "## Analyzer Failures");
    let _ = writeln!(out);
    for fault in &result.analyzer_faults {
        let _ = writeln!(out, "- {fault}");
    }
}
