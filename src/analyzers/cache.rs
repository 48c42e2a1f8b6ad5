//! Dependency caching checks.
//!
//! Install detection is a substring match over the serialized steps, so a
//! match is a signal that dependencies are installed, not proof.

use super::Analyzer;
use crate::core::scoring::impact;
use crate::core::{Category, EstimatedSavings, Finding, Priority};
use crate::heuristics::{examples, Language};
use crate::pipeline::{ConfigTree, Job, StepKind};

/// Package-manager invocations that install dependencies.
static INSTALL_COMMANDS: &[(&str, Language)] = &[
    ("npm install", Language::NodeJs),
    ("npm ci", Language::NodeJs),
    ("yarn install", Language::NodeJs),
    ("pnpm install", Language::NodeJs),
    ("bundle install", Language::Ruby),
    ("pip install", Language::Python),
    ("pipenv install", Language::Python),
    ("poetry install", Language::Python),
    ("mvn install", Language::Java),
    ("mvn dependency", Language::Java),
    ("gradle dependencies", Language::Java),
    ("composer install", Language::Php),
    ("go mod download", Language::Go),
];

pub struct CacheAnalyzer;

impl Analyzer for CacheAnalyzer {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn analyze(&self, config: &ConfigTree) -> Vec<Finding> {
        config.jobs.iter().flat_map(analyze_job).collect()
    }
}

/// The first known install command in `blob`, with its ecosystem.
pub fn detect_install(blob: &str) -> Option<(&'static str, Language)> {
    let blob = blob.to_ascii_lowercase();
    INSTALL_COMMANDS
        .iter()
        .find(|(command, _)| blob.contains(command))
        .copied()
}

fn analyze_job(job: &Job) -> Vec<Finding> {
    let mut findings = Vec::new();
    let restore_keys: Vec<&str> = job
        .steps
        .iter()
        .filter_map(|step| match &step.kind {
            StepKind::RestoreCache { keys } => Some(keys.iter().map(String::as_str)),
            _ => None,
        })
        .flatten()
        .collect();
    let has_restore = job
        .steps
        .iter()
        .any(|step| matches!(step.kind, StepKind::RestoreCache { .. }));
    let has_save = job
        .steps
        .iter()
        .any(|step| matches!(step.kind, StepKind::SaveCache));

    let language = cache_language(job);

    if let Some((command, _)) = detect_install(&job.steps_blob()) {
        if !has_restore {
            findings.push(missing_cache(job, command, language, has_save));
        }
    }

    if has_restore && !restore_keys.iter().any(|key| key.contains("checksum")) {
        findings.push(weak_cache_key(job, &restore_keys, language));
    }

    findings
}

/// Ecosystem for remediation snippets: the primary image first, then the
/// install command when the image is not specific.
fn cache_language(job: &Job) -> Language {
    match Language::from_image(job.executor.image()) {
        Language::Generic => detect_install(&job.steps_blob())
            .map(|(_, language)| language)
            .unwrap_or(Language::Generic),
        language => language,
    }
}

fn missing_cache(job: &Job, command: &str, language: Language, has_save: bool) -> Finding {
    let current = if has_save {
        format!(
            "Job '{}' runs `{command}` and saves a cache, but never restores it.",
            job.name
        )
    } else {
        format!(
            "Job '{}' runs `{command}` without restore_cache or save_cache steps.",
            job.name
        )
    };

    Finding::new(
        Category::Cache,
        "missing",
        &job.name,
        Priority::High,
        impact::MISSING_CACHE,
        format!("Dependencies are not cached in job '{}'", job.name),
    )
    .current_state(current)
    .problem("Every run downloads and installs the full dependency tree from scratch.")
    .recommendation(format!(
        "Restore a cache keyed on the checksum of {} before installing, and save it afterwards.",
        language.lockfile()
    ))
    .example(examples::dependency_cache(language))
    .savings(EstimatedSavings::time("2-5 min"))
    .affecting([job.name.as_str()])
}

fn weak_cache_key(job: &Job, keys: &[&str], language: Language) -> Finding {
    let shown = if keys.is_empty() {
        "no keys".to_string()
    } else {
        keys.join(", ")
    };

    Finding::new(
        Category::Cache,
        "weak-key",
        &job.name,
        Priority::Medium,
        impact::WEAK_CACHE_KEY,
        format!("Cache key does not track dependencies in job '{}'", job.name),
    )
    .current_state(format!("restore_cache in job '{}' uses: {shown}", job.name))
    .problem(
        "Without a checksum in the key the cache is never invalidated when dependencies change, \
         so stale packages are restored or the cache is rebuilt only by hand.",
    )
    .recommendation(format!(
        "Include {{{{ checksum \"{}\" }}}} in the primary key and keep a prefix key as fallback.",
        language.lockfile()
    ))
    .example(examples::checksum_cache_keys(language))
    .savings(EstimatedSavings::time("1-2 min"))
    .affecting([job.name.as_str()])
}
