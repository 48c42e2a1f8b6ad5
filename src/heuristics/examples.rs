//! Remediation snippets attached to findings.
//!
//! Snippets are CircleCI YAML fragments meant to be pasted into a job or
//! workflow; they are illustrative and not validated against the input.

use super::language::Language;

/// Restore → install → save sequence keyed on the ecosystem's lockfile.
pub fn dependency_cache(language: Language) -> String {
    let key = checksum_key(language);
    format!(
        "steps:\n  \
         - checkout\n  \
         - restore_cache:\n      \
             keys:\n        \
               - {key}\n        \
               - {prefix}-\n  \
         - run: {install}\n  \
         - save_cache:\n      \
             key: {key}\n      \
             paths:\n        \
               - {path}",
        prefix = language.cache_prefix(),
        install = language.install_command(),
        path = language.dependency_path(),
    )
}

/// A restore step whose primary key tracks the lockfile.
pub fn checksum_cache_keys(language: Language) -> String {
    format!(
        "- restore_cache:\n    \
           keys:\n      \
             - {key}\n      \
             - {prefix}-",
        key = checksum_key(language),
        prefix = language.cache_prefix(),
    )
}

fn checksum_key(language: Language) -> String {
    format!(
        "{}-{{{{ checksum \"{}\" }}}}",
        language.cache_prefix(),
        language.lockfile()
    )
}

pub fn resource_class(job: &str, tier: &str) -> String {
    format!("jobs:\n  {job}:\n    resource_class: {tier}")
}

pub fn test_splitting(job: &str) -> String {
    format!(
        "jobs:\n  {job}:\n    \
           parallelism: 4\n    \
           steps:\n      \
             - checkout\n      \
             - run: |\n          \
                 TESTS=$(circleci tests glob \"**/*.test.*\" | circleci tests split --split-by=timings)\n          \
                 run-tests $TESTS\n      \
             - store_test_results:\n          \
                 path: test-results"
    )
}

/// Workflow where `jobs` fan out after a shared first job.
pub fn fan_out(workflow: &str, jobs: &[String]) -> String {
    let mut snippet = format!("workflows:\n  {workflow}:\n    jobs:\n");
    for job in jobs {
        snippet.push_str(&format!("      - {job}\n"));
    }
    snippet.push_str("      # jobs without `requires` start together");
    snippet
}

pub fn layer_caching() -> String {
    "- setup_remote_docker:\n    \
       docker_layer_caching: true\n\
     - run: docker build -t app ."
        .to_string()
}

pub fn orb_usage(alias: &str, reference: &str) -> String {
    format!("orbs:\n  {alias}: {reference}")
}

pub fn approval_gate(workflow: &str, before: &str) -> String {
    format!(
        "workflows:\n  {workflow}:\n    \
           jobs:\n      \
             - hold-for-approval:\n          \
                 type: approval\n      \
             - {before}:\n          \
                 requires:\n            \
                   - hold-for-approval"
    )
}

pub fn secret_from_context(job: &str) -> String {
    format!(
        "workflows:\n  main:\n    \
           jobs:\n      \
             - {job}:\n          \
                 context: production-secrets\n\
         # then reference the value as $API_TOKEN inside the job"
    )
}
