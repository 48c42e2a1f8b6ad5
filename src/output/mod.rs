pub mod json;
pub mod markdown;
pub mod terminal;

use crate::core::{AnalysisResult, Finding, Priority};
use crate::formatting::FormattingConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
    Markdown,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Findings below this priority are left out of the listing. Summary
    /// counts always cover the full result.
    pub min_priority: Option<Priority>,
    pub formatting: FormattingConfig,
}

impl ReportOptions {
    fn shows(&self, priority: Priority) -> bool {
        self.min_priority
            .map_or(true, |threshold| priority.meets(threshold))
    }

    /// Priority groups to list, high first, each paired with its findings in
    /// aggregated order. Empty groups are skipped.
    pub(crate) fn groups<'a>(
        &self,
        result: &'a AnalysisResult,
    ) -> Vec<(Priority, Vec<&'a Finding>)> {
        Priority::ALL
            .into_iter()
            .filter(|&priority| self.shows(priority))
            .map(|priority| (priority, result.with_priority(priority).collect::<Vec<_>>()))
            .filter(|(_, findings)| !findings.is_empty())
            .collect()
    }
}

pub fn render(
    result: &AnalysisResult,
    format: OutputFormat,
    options: &ReportOptions,
) -> Result<String> {
    match format {
        OutputFormat::Terminal => Ok(terminal::render_terminal(result, options)),
        OutputFormat::Json => json::render_json(result),
        OutputFormat::Markdown => Ok(markdown::render_markdown(result, options)),
    }
}

/// Write a rendered report to `output_file`, or stdout when absent.
pub fn write_report(content: &str, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            fs::write(path, content)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                handle.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

/// Summary line shared by terminal and markdown output.
pub(crate) fn savings_line(finding: &Finding) -> Option<String> {
    let savings = finding.estimated_savings.as_ref()?;
    let parts: Vec<String> = savings
        .cost_reduction_percent
        .map(|cost| format!("~{cost}% cost"))
        .into_iter()
        .chain(savings.time_reduction.as_ref().map(|time| format!("{time} faster")))
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}
