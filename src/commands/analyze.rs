use crate::aggregator::Aggregator;
use crate::analyzers::analyzer_names;
use crate::config::{self, OptimizerConfig};
use crate::core::{AnalysisResult, Priority};
use crate::formatting::FormattingConfig;
use crate::output::{self, OutputFormat, ReportOptions};
use crate::pipeline::load_config_file;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};

pub struct AnalyzeConfig {
    pub config_path: PathBuf,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub min_priority: Option<Priority>,
    pub settings: Option<PathBuf>,
    pub parallel: bool,
    pub formatting_config: FormattingConfig,
}

/// Load, analyze, render. Load failures surface as [`crate::errors::LoadError`]
/// inside the returned error.
pub fn handle_analyze(config: AnalyzeConfig) -> Result<AnalysisResult> {
    let settings = resolve_settings(config.settings.as_ref());

    let tree = load_config_file(&config.config_path)?;
    info!(
        jobs = tree.jobs.len(),
        workflows = tree.workflows.len(),
        "Loaded {}",
        config.config_path.display()
    );

    let aggregator =
        Aggregator::from_config(&settings).parallel(config.parallel || settings.parallel);
    let result = aggregator.run(&tree);

    let format = config
        .format
        .or(settings.output.format)
        .unwrap_or_default();
    let options = ReportOptions {
        min_priority: config.min_priority.or(settings.output.min_priority),
        formatting: config.formatting_config,
    };
    let rendered = output::render(&result, format, &options)?;
    output::write_report(&rendered, config.output.as_deref())?;

    Ok(result)
}

pub fn list_analyzers() -> String {
    analyzer_names().join("\n")
}

fn resolve_settings(explicit: Option<&PathBuf>) -> OptimizerConfig {
    let settings = match explicit {
        Some(path) => config::load_settings_from(path).unwrap_or_else(|e| {
            warn!("{e:#}. Using default settings.");
            OptimizerConfig::default()
        }),
        None => config::load_settings(),
    };

    for name in settings.unknown_analyzers(&analyzer_names()) {
        warn!("Unknown analyzer '{name}' in disabled_analyzers; ignoring it");
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LoadError;
    use std::fs;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    fn analyze_config(dir: &TempDir, yaml: Option<&str>) -> AnalyzeConfig {
        let config_path = dir.path().join("config.yml");
        if let Some(yaml) = yaml {
            fs::write(&config_path, yaml).unwrap();
        }
        let settings = dir.path().join("settings.toml");
        fs::write(&settings, "disabled_analyzers = [\"best-practices\"]\n").unwrap();
        AnalyzeConfig {
            config_path,
            format: Some(OutputFormat::Json),
            output: Some(dir.path().join("report.json")),
            min_priority: None,
            settings: Some(settings),
            parallel: false,
            formatting_config: FormattingConfig::plain(),
        }
    }

    #[test]
    fn test_writes_report_and_returns_result() {
        let dir = TempDir::new().unwrap();
        let config = analyze_config(
            &dir,
            Some("jobs:\n  build:\n    docker:\n      - image: cimg/base:stable\n    resource_class: xlarge\n    steps:\n      - checkout\n"),
        );
        let report = config.output.clone().unwrap();
        let result = handle_analyze(config).unwrap();
        assert!(result
            .findings
            .iter()
            .any(|f| f.id == "resource-oversized-build"));
        let written = fs::read_to_string(report).unwrap();
        assert!(written.contains("resource-oversized-build"));
    }

    #[test]
    fn test_missing_config_is_load_error() {
        let dir = TempDir::new().unwrap();
        let err = handle_analyze(analyze_config(&dir, None)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::NotFound { .. })
        ));
    }

    #[traced_test]
    #[test]
    fn test_unknown_disabled_analyzer_is_warned() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "disabled_analyzers = [\"cache\", \"speling\"]\n").unwrap();

        let settings = resolve_settings(Some(&path));
        assert!(settings.is_disabled("cache"));
        assert!(logs_contain("Unknown analyzer 'speling'"));
        assert!(!logs_contain("Unknown analyzer 'cache'"));
    }

    #[test]
    fn test_list_analyzers() {
        let listing = list_analyzers();
        assert!(listing.starts_with("resource-class"));
        assert!(listing.ends_with("best-practices"));
    }
}
