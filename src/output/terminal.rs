use super::{savings_line, ReportOptions};
use crate::core::{AnalysisResult, Finding, Priority};
use crate::formatting::Palette;
use comfy_table::{presets, Cell, ContentArrangement, Table};
use std::fmt::Write;

pub fn render_terminal(result: &AnalysisResult, options: &ReportOptions) -> String {
    let palette = Palette::new(options.formatting);
    let mut out = String::new();

    let _ = writeln!(out, "{}", palette.header("CircleCI Optimization Report"));
    let _ = writeln!(out);

    if result.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            palette.success("No optimization opportunities found. The config looks good.")
        );
        append_faults(&mut out, result, &palette);
        return out;
    }

    let _ = writeln!(out, "{}", summary_table(result, options));
    let _ = writeln!(out);

    for (priority, findings) in options.groups(result) {
        let heading = format!("{} priority ({})", priority, findings.len());
        let _ = writeln!(out, "{}", palette.priority(priority, &heading));
        let _ = writeln!(out);
        for (index, finding) in findings.iter().enumerate() {
            append_finding(&mut out, index + 1, finding, &palette);
        }
    }

    append_faults(&mut out, result, &palette);
    out
}

fn summary_table(result: &AnalysisResult, options: &ReportOptions) -> Table {
    let mut table = Table::new();
    if options.formatting.use_color() {
        table.load_preset(presets::UTF8_FULL);
    } else {
        table.load_preset(presets::ASCII_FULL);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value"]);

    table.add_row(vec![
        Cell::new("Total findings"),
        Cell::new(result.total_findings),
    ]);
    for priority in Priority::ALL {
        table.add_row(vec![
            Cell::new(format!("{priority} priority")),
            Cell::new(result.counts.get(priority)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Estimated cost reduction"),
        Cell::new(format!("{}%", result.estimated_savings.cost_reduction_percent)),
    ]);
    table.add_row(vec![
        Cell::new("Estimated time saved"),
        Cell::new(format!("{} min", result.estimated_savings.time_saved)),
    ]);
    table
}

fn append_finding(out: &mut String, number: usize, finding: &Finding, palette: &Palette) {
    let _ = writeln!(
        out,
        "{}. {} {}",
        number,
        palette.bold(&finding.title),
        palette.dim(&format!("[{}]", finding.id))
    );
    let _ = writeln!(out, "   Problem:        {}", finding.problem);
    if !finding.current_state.is_empty() {
        let _ = writeln!(out, "   Current state:  {}", finding.current_state);
    }
    let _ = writeln!(out, "   Recommendation: {}", finding.recommendation);
    if let Some(savings) = savings_line(finding) {
        let _ = writeln!(out, "   Savings:        {}", palette.success(&savings));
    }
    if !finding.affected_jobs.is_empty() {
        let _ = writeln!(out, "   Affected jobs:  {}", finding.affected_jobs.join(", "));
    }
    if let Some(example) = &finding.example {
        let _ = writeln!(out, "   Example:");
        for line in example.lines() {
            let _ = writeln!(out, "     {}", palette.dim(line));
        }
    }
    let _ = writeln!(out);
}

fn append_faults(out: &mut String, result: &AnalysisResult, palette: &Palette) {
    if result.analyzer_faults.is_empty() {
        return;
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        palette.warning("Some analyzers failed; their checks were skipped:")
    );
    for fault in &result.analyzer_faults {
        let _ = writeln!(out, "  - {fault}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::summarize;
    use crate::errors::AnalyzerFault;
    use crate::formatting::FormattingConfig;
    use crate::output::tests::sample_result;

    fn plain() -> ReportOptions {
        ReportOptions {
            min_priority: None,
            formatting: FormattingConfig::plain(),
        }
    }

    #[test]
    fn test_groups_are_ordered_high_to_low() {
        let text = render_terminal(&sample_result(), &plain());
        let high = text.find("High priority (1)").unwrap();
        let medium = text.find("Medium priority (1)").unwrap();
        let low = text.find("Low priority (1)").unwrap();
        assert!(high < medium && medium < low);
        assert!(text.contains("Recommendation: Use small."));
        assert!(text.contains("~88% cost"));
        assert!(text.contains("Affected jobs:  build"));
    }

    #[test]
    fn test_min_priority_hides_groups_but_keeps_counts() {
        let options = ReportOptions {
            min_priority: Some(Priority::High),
            ..plain()
        };
        let text = render_terminal(&sample_result(), &options);
        assert!(text.contains("High priority (1)"));
        assert!(!text.contains("Low priority (1)"));
        assert!(text.contains("Total findings"));
        assert!(text.contains('3'));
    }

    #[test]
    fn test_empty_result_message() {
        let text = render_terminal(&summarize(Vec::new(), Vec::new()), &plain());
        assert!(text.contains("No optimization opportunities found"));
    }

    #[test]
    fn test_faults_are_listed() {
        let result = summarize(Vec::new(), vec![AnalyzerFault::new("cache", "boom")]);
        let text = render_terminal(&result, &plain());
        assert!(text.contains("analyzer 'cache' failed: boom"));
    }

    #[test]
    fn test_faults_follow_findings() {
        let result = summarize(
            sample_result().findings,
            vec![AnalyzerFault::new("orbs", "bad pattern")],
        );
        let text = render_terminal(&result, &plain());
        let last_group = text.find("Low priority (1)").unwrap();
        let faults = text.find("Some analyzers failed").unwrap();
        assert!(last_group < faults);
        assert!(text.trim_end().ends_with("analyzer 'orbs' failed: bad pattern"));
    }
}
