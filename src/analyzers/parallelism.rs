//! Test splitting and workflow fan-out opportunities.

use super::Analyzer;
use crate::core::scoring::{impact, FAN_OUT_SAVINGS_CAP};
use crate::core::{Category, EstimatedSavings, Finding, Priority};
use crate::heuristics::examples;
use crate::pipeline::{ConfigTree, Job, Workflow};

static TEST_KEYWORDS: &[&str] = &["test", "spec", "jest", "rspec", "pytest", "mocha"];

pub struct ParallelismAnalyzer;

impl Analyzer for ParallelismAnalyzer {
    fn name(&self) -> &'static str {
        "parallelism"
    }

    fn analyze(&self, config: &ConfigTree) -> Vec<Finding> {
        let jobs = config.jobs.iter().filter_map(test_splitting);
        let workflows = config.workflows.iter().filter_map(fan_out);
        jobs.chain(workflows).collect()
    }
}

fn looks_like_tests(job: &Job) -> bool {
    let name = job.name.to_ascii_lowercase();
    let blob = job.steps_blob().to_ascii_lowercase();
    TEST_KEYWORDS
        .iter()
        .any(|keyword| name.contains(keyword) || blob.contains(keyword))
}

fn test_splitting(job: &Job) -> Option<Finding> {
    if job.is_parallelized() || !looks_like_tests(job) {
        return None;
    }

    Some(
        Finding::new(
            Category::Parallel,
            "tests",
            &job.name,
            Priority::Medium,
            impact::TEST_PARALLELISM,
            format!("Tests in job '{}' run on a single container", job.name),
        )
        .current_state(format!(
            "Job '{}' runs tests with parallelism {}.",
            job.name,
            job.parallelism.unwrap_or(1)
        ))
        .problem(
            "The whole suite runs serially, so the job's wall time grows with every test added.",
        )
        .recommendation(
            "Set parallelism and split the suite with `circleci tests split --split-by=timings`, \
             storing test results so timing data is available.",
        )
        .example(examples::test_splitting(&job.name))
        .savings(EstimatedSavings::time("40-50%"))
        .affecting([job.name.as_str()]),
    )
}

fn fan_out(workflow: &Workflow) -> Option<Finding> {
    let independent: Vec<String> = workflow
        .independent_jobs()
        .map(|job| job.name.clone())
        .collect();
    if independent.len() < 2 {
        return None;
    }

    let minutes = (2 * independent.len() as u32).min(FAN_OUT_SAVINGS_CAP);
    Some(
        Finding::new(
            Category::Parallel,
            "workflow",
            &workflow.name,
            Priority::Medium,
            impact::WORKFLOW_FAN_OUT,
            format!(
                "{} independent jobs in workflow '{}' can run in parallel",
                independent.len(),
                workflow.name
            ),
        )
        .current_state(format!(
            "Jobs {} in workflow '{}' have no `requires` dependencies.",
            independent.join(", "),
            workflow.name
        ))
        .problem(
            "Independent jobs are a fan-out opportunity; repeating the same setup in each of them \
             or chaining them later wastes the concurrency already available.",
        )
        .recommendation(
            "Keep these jobs free of `requires` so they start together, and move shared setup \
             into one upstream job that persists to a workspace.",
        )
        .example(examples::fan_out(&workflow.name, &independent))
        .savings(EstimatedSavings::time(format!("{minutes} min")))
        .affecting(independent),
    )
}
