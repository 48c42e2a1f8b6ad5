//! Tool settings read from `.circleopt.toml`.
//!
//! ```toml
//! disabled_analyzers = ["orbs"]
//! parallel = true
//!
//! [output]
//! format = "json"
//! min_priority = "medium"
//! ```

pub mod loader;

pub use loader::{load_settings, load_settings_from, parse_settings, SETTINGS_FILE_NAME};

use crate::core::Priority;
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Analyzer names to skip, e.g. `"orbs"`.
    pub disabled_analyzers: Vec<String>,

    /// Run analyzers on the rayon thread pool
    pub parallel: bool,

    pub output: OutputSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: Option<OutputFormat>,

    /// Hide findings below this priority in the report
    pub min_priority: Option<Priority>,
}

impl OptimizerConfig {
    pub fn is_disabled(&self, analyzer: &str) -> bool {
        self.disabled_analyzers.iter().any(|name| name == analyzer)
    }

    /// Names in `disabled_analyzers` that match no known analyzer.
    pub fn unknown_analyzers<'a>(&'a self, known: &[&str]) -> Vec<&'a str> {
        self.disabled_analyzers
            .iter()
            .map(String::as_str)
            .filter(|name| !known.contains(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_lookup() {
        let config = OptimizerConfig {
            disabled_analyzers: vec!["orbs".to_string(), "nope".to_string()],
            ..Default::default()
        };
        assert!(config.is_disabled("orbs"));
        assert!(!config.is_disabled("cache"));
        assert_eq!(config.unknown_analyzers(&["orbs", "cache"]), vec!["nope"]);
    }
}
