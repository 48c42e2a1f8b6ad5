//! Hardcoded-secret detection.
//!
//! The heuristic is length based: any run of 20 or more ASCII letters and
//! digits in a step is treated as a possible credential, unless the step
//! interpolates variables (`$VAR`, `${VAR}`, `<< parameters.x >>`), in which
//! case it is assumed to read its secrets from the environment. Long
//! identifiers and hashes trip it; short secrets slip past it.

use super::Analyzer;
use crate::core::scoring::impact;
use crate::core::{Category, Finding, Priority};
use crate::heuristics::examples;
use crate::pipeline::{ConfigTree, Job, Step};
use once_cell::sync::Lazy;
use regex::Regex;

static SECRET_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9]{20,}").expect("valid regex"));

static INTERPOLATION_MARKERS: &[&str] = &["$", "<<"];

pub struct BestPracticesAnalyzer;

impl Analyzer for BestPracticesAnalyzer {
    fn name(&self) -> &'static str {
        "best-practices"
    }

    fn analyze(&self, config: &ConfigTree) -> Vec<Finding> {
        config.jobs.iter().filter_map(hardcoded_secret).collect()
    }
}

/// The first suspicious literal in `text`, if `text` has no interpolation.
pub fn secret_candidate(text: &str) -> Option<&str> {
    if INTERPOLATION_MARKERS.iter().any(|m| text.contains(m)) {
        return None;
    }
    SECRET_CANDIDATE.find(text).map(|m| m.as_str())
}

fn hardcoded_secret(job: &Job) -> Option<Finding> {
    let (step, literal) = job.steps.iter().find_map(|step| {
        let text = step.serialized();
        secret_candidate(&text).map(|literal| (step, mask(literal)))
    })?;

    Some(
        Finding::new(
            Category::Practice,
            "secret",
            &job.name,
            Priority::High,
            impact::HARDCODED_SECRET,
            format!("Possible hardcoded secret in job '{}'", job.name),
        )
        .current_state(format!(
            "Step '{}' in job '{}' contains the literal {literal}.",
            label(step),
            job.name
        ))
        .problem(
            "Credentials committed to the config are visible to anyone with repository access \
             and end up in build logs.",
        )
        .recommendation(
            "Move the value into a project environment variable or a context, rotate it, \
             and reference it as $NAME.",
        )
        .example(examples::secret_from_context(&job.name))
        .affecting([job.name.as_str()]),
    )
}

fn label(step: &Step) -> String {
    const MAX: usize = 40;
    let label = step.label();
    if label.chars().count() > MAX {
        let cut: String = label.chars().take(MAX).collect();
        format!("{cut}…")
    } else {
        label
    }
}

/// Keep the first four characters so the report does not repeat the secret.
fn mask(literal: &str) -> String {
    let prefix: String = literal.chars().take(4).collect();
    format!("{prefix}… ({} chars)", literal.len())
}
