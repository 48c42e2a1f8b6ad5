use circleopt::core::scoring::TIME_SAVINGS_CAP;
use circleopt::{analyze, parse_config};
use proptest::prelude::*;

const TIERS: &[&str] = &["", "small", "medium", "large", "xlarge", "2xlarge"];
const COMMANDS: &[&str] = &[
    "npm ci",
    "bundle install",
    "pytest -q",
    "docker build .",
    "aws s3 sync dist s3://bucket",
    "make",
    "echo $TOKEN",
];

#[derive(Debug, Clone)]
struct JobSpec {
    tier: usize,
    commands: Vec<usize>,
    restore: bool,
    parallelism: Option<u8>,
}

fn job_strategy() -> impl Strategy<Value = JobSpec> {
    (
        0..TIERS.len(),
        prop::collection::vec(0..COMMANDS.len(), 0..9),
        any::<bool>(),
        prop::option::of(1u8..5),
    )
        .prop_map(|(tier, commands, restore, parallelism)| JobSpec {
            tier,
            commands,
            restore,
            parallelism,
        })
}

fn render_config(jobs: &[JobSpec], requires_first: bool) -> String {
    let mut yaml = String::from("jobs:\n");
    for (index, job) in jobs.iter().enumerate() {
        yaml.push_str(&format!("  job{index}:\n"));
        yaml.push_str("    docker:\n      - image: cimg/node:20.11\n");
        if !TIERS[job.tier].is_empty() {
            yaml.push_str(&format!("    resource_class: {}\n", TIERS[job.tier]));
        }
        if let Some(parallelism) = job.parallelism {
            yaml.push_str(&format!("    parallelism: {parallelism}\n"));
        }
        yaml.push_str("    steps:\n      - checkout\n");
        if job.restore {
            yaml.push_str("      - restore_cache:\n          key: deps-v1\n");
        }
        for &command in &job.commands {
            yaml.push_str(&format!("      - run: \"{}\"\n", COMMANDS[command]));
        }
    }

    yaml.push_str("workflows:\n  main:\n    jobs:\n");
    for index in 0..jobs.len() {
        if requires_first && index > 0 {
            yaml.push_str(&format!("      - job{index}:\n          requires: [job0]\n"));
        } else {
            yaml.push_str(&format!("      - job{index}\n"));
        }
    }
    yaml
}

proptest! {
    #[test]
    fn prop_analysis_is_deterministic(
        jobs in prop::collection::vec(job_strategy(), 1..6),
        requires_first in any::<bool>(),
    ) {
        let config = parse_config(&render_config(&jobs, requires_first)).unwrap();
        let first = serde_json::to_string(&analyze(&config)).unwrap();
        let second = serde_json::to_string(&analyze(&config)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_savings_stay_in_range(
        jobs in prop::collection::vec(job_strategy(), 1..8),
        requires_first in any::<bool>(),
    ) {
        let config = parse_config(&render_config(&jobs, requires_first)).unwrap();
        let result = analyze(&config);

        prop_assert!(result.estimated_savings.time_saved <= TIME_SAVINGS_CAP);
        prop_assert!(result.estimated_savings.cost_reduction_percent <= 100);
        if result.findings.iter().all(|f| f.cost_reduction_percent().is_none()) {
            prop_assert_eq!(result.estimated_savings.cost_reduction_percent, 0);
        }
        prop_assert_eq!(
            result.total_findings,
            result.counts.high + result.counts.medium + result.counts.low
        );
    }
}
