//! Command implementations behind the `circleopt` binary.

pub mod analyze;

pub use analyze::{handle_analyze, list_analyzers, AnalyzeConfig};
