// Export modules for library usage
pub mod aggregator;
pub mod analyzers;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod formatting;
pub mod heuristics;
pub mod observability;
pub mod output;
pub mod pipeline;

// Re-export commonly used types
pub use crate::core::{
    AnalysisResult, Category, EstimatedSavings, Finding, Priority, PriorityCounts, SavingsSummary,
};

pub use crate::aggregator::Aggregator;
pub use crate::analyzers::{default_analyzers, Analyzer};
pub use crate::config::OptimizerConfig;
pub use crate::errors::{AnalyzerFault, LoadError};
pub use crate::output::OutputFormat;
pub use crate::pipeline::{load_config_file, parse_config, ConfigTree};

/// Run every built-in analyzer over `config`.
pub fn analyze(config: &ConfigTree) -> AnalysisResult {
    Aggregator::new().run(config)
}
