use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::OptimizerConfig;

pub const SETTINGS_FILE_NAME: &str = ".circleopt.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse settings from TOML text.
pub fn parse_settings(contents: &str) -> Result<OptimizerConfig, String> {
    toml::from_str::<OptimizerConfig>(contents)
        .map_err(|e| format!("Failed to parse {SETTINGS_FILE_NAME}: {e}"))
}

/// Load settings from an explicit path. A missing or invalid file is an error.
pub fn load_settings_from(path: &Path) -> Result<OptimizerConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    parse_settings(&contents).map_err(anyhow::Error::msg)
}

/// Directories from `start` upwards, at most `max_depth` of them.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Discover `.circleopt.toml` from the current directory upwards.
///
/// Discovery never fails the run: unreadable or invalid files are logged and
/// the defaults are used.
pub fn load_settings() -> OptimizerConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            warn!("Failed to get current directory: {e}. Using default settings.");
            return OptimizerConfig::default();
        }
    };

    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(SETTINGS_FILE_NAME))
        .filter(|path| path.is_file())
        .find_map(|path| try_load(&path))
        .unwrap_or_else(|| {
            debug!("No {SETTINGS_FILE_NAME} found. Using default settings.");
            OptimizerConfig::default()
        })
}

fn try_load(path: &Path) -> Option<OptimizerConfig> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Failed to read settings file {}: {e}", path.display());
            return None;
        }
    };

    match parse_settings(&contents) {
        Ok(config) => {
            debug!("Loaded settings from {}", path.display());
            Some(config)
        }
        Err(e) => {
            warn!("{e}. Using default settings.");
            None
        }
    }
}
