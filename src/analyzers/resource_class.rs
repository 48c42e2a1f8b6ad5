//! Resource class (executor size) checks for docker jobs.

use super::Analyzer;
use crate::core::scoring::{
    self, credit_rate, impact, is_oversized, savings_percent, SHORT_JOB_MINUTES, SMALL_TIER_MINUTES,
};
use crate::core::{Category, EstimatedSavings, Finding, Priority};
use crate::heuristics::{estimate_duration_minutes, examples};
use crate::pipeline::{ConfigTree, Job};

pub struct ResourceClassAnalyzer;

impl Analyzer for ResourceClassAnalyzer {
    fn name(&self) -> &'static str {
        "resource-class"
    }

    fn analyze(&self, config: &ConfigTree) -> Vec<Finding> {
        config
            .jobs
            .iter()
            .filter(|job| job.executor.is_container())
            .flat_map(analyze_job)
            .collect()
    }
}

fn analyze_job(job: &Job) -> Vec<Finding> {
    let duration = estimate_duration_minutes(job.steps.len());
    let mut findings = Vec::new();

    if let Some(finding) = oversized_tier(job, duration) {
        findings.push(finding);
    }
    if job.resource_class.is_none() {
        findings.push(unspecified_tier(job));
    }

    findings
}

fn oversized_tier(job: &Job, duration: u32) -> Option<Finding> {
    let tier = job.tier();
    if duration >= SHORT_JOB_MINUTES || !is_oversized(tier) {
        return None;
    }

    let recommended = if duration < SMALL_TIER_MINUTES {
        "small"
    } else {
        "medium"
    };
    let current_rate = credit_rate(tier)?;
    let recommended_rate = credit_rate(recommended)?;
    let current_cost = current_rate * duration;
    let recommended_cost = recommended_rate * duration;
    let savings = savings_percent(current_cost, recommended_cost);

    Some(
        Finding::new(
            Category::Resource,
            "oversized",
            &job.name,
            Priority::High,
            impact::oversized_tier(savings),
            format!("Oversized resource class for job '{}'", job.name),
        )
        .current_state(format!(
            "Job '{}' runs on resource_class {tier} ({current_rate} credits/min) with {} steps, \
             an estimated {duration} min run costing ~{current_cost} credits.",
            job.name,
            job.steps.len(),
        ))
        .problem(
            "Short jobs rarely use the CPU and memory of a large executor, \
             but every minute is billed at the larger rate.",
        )
        .recommendation(format!(
            "Switch to resource_class {recommended} ({recommended_rate} credits/min, \
             ~{recommended_cost} credits per run) and increase it again only if the job slows down."
        ))
        .example(examples::resource_class(&job.name, recommended))
        .savings(EstimatedSavings::cost(savings))
        .affecting([job.name.as_str()]),
    )
}

fn unspecified_tier(job: &Job) -> Finding {
    Finding::new(
        Category::Resource,
        "unspecified",
        &job.name,
        Priority::Low,
        impact::UNSPECIFIED_TIER,
        format!("No resource class specified for job '{}'", job.name),
    )
    .current_state(format!(
        "Job '{}' declares no resource_class and runs on the default {}.",
        job.name,
        scoring::DEFAULT_RESOURCE_CLASS
    ))
    .problem(
        "The implicit default hides the job's cost and may be larger or smaller than the work needs.",
    )
    .recommendation(
        "Declare a resource_class sized to the job so its cost is explicit and reviewable.",
    )
    .example(examples::resource_class(&job.name, scoring::DEFAULT_RESOURCE_CLASS))
    .affecting([job.name.as_str()])
}
