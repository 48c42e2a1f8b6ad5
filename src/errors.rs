//! Error types for configuration loading and analyzer supervision.
//!
//! Loader failures are fatal to a run and carry a remediation hint for the
//! user. Analyzer faults are always recovered by the aggregator and only
//! degrade the result.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a configuration document into a [`ConfigTree`].
///
/// [`ConfigTree`]: crate::pipeline::ConfigTree
#[derive(Debug, Error)]
pub enum LoadError {
    /// The configuration path does not exist
    #[error("configuration file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The path exists but could not be read (permissions, directory, I/O)
    #[error("cannot read configuration file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML
    #[error("invalid YAML{}: {message}", location_suffix(.line, .column))]
    Syntax {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    /// The document parsed but is not a usable pipeline configuration
    #[error("invalid configuration: {0}")]
    StructurallyInvalid(String),
}

impl LoadError {
    /// Classify an I/O failure for `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Unreadable { path, source },
        }
    }

    /// Wrap a YAML parser error, keeping its location when it has one.
    pub fn from_yaml(error: serde_yaml::Error) -> Self {
        let location = error.location();
        Self::Syntax {
            message: error.to_string(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
        }
    }

    pub fn structurally_invalid(message: impl Into<String>) -> Self {
        Self::StructurallyInvalid(message.into())
    }

    /// Remediation guidance shown below the error message.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => {
                "Run circleopt from the repository root or pass the config path, e.g. `circleopt path/to/config.yml`."
            }
            Self::Unreadable { .. } => {
                "Check that the path is a regular file and that the current user can read it."
            }
            Self::Syntax { .. } => {
                "Fix the YAML syntax at the reported location; `circleci config validate` gives more detail."
            }
            Self::StructurallyInvalid(_) => {
                "A CircleCI config must be a mapping with a non-empty `jobs` section."
            }
        }
    }
}

fn location_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at line {line}, column {column}"),
        (Some(line), None) => format!(" at line {line}"),
        _ => String::new(),
    }
}

/// An analyzer that panicked or otherwise failed during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("analyzer '{analyzer}' failed: {message}")]
pub struct AnalyzerFault {
    pub analyzer: String,
    pub message: String,
}

impl AnalyzerFault {
    pub fn new(analyzer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            analyzer: analyzer.into(),
            message: message.into(),
        }
    }
}
