use circleopt::aggregator::{sort_findings, Aggregator};
use circleopt::analyzers::{Analyzer, WorkflowAnalyzer};
use circleopt::config::OptimizerConfig;
use circleopt::{default_analyzers, parse_config, Category, ConfigTree, Finding, Priority};
use indoc::indoc;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn sample_config() -> ConfigTree {
    parse_config(indoc! {"
        jobs:
          build:
            docker:
              - image: cimg/node:20.11
            resource_class: large
            steps:
              - checkout
              - run: npm ci
              - run: npm test
        workflows:
          ci:
            jobs: [build, lint, audit, docs, package]
    "})
    .unwrap()
}

struct PanickingAnalyzer;

impl Analyzer for PanickingAnalyzer {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn analyze(&self, _config: &ConfigTree) -> Vec<Finding> {
        panic!("unexpected config shape")
    }
}

struct FixedAnalyzer(Vec<Finding>);

impl Analyzer for FixedAnalyzer {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn analyze(&self, _config: &ConfigTree) -> Vec<Finding> {
        self.0.clone()
    }
}

#[test]
fn test_panicking_analyzer_is_isolated() {
    let config = sample_config();
    let baseline = Aggregator::with_analyzers(vec![Box::new(WorkflowAnalyzer)]).run(&config);

    let result = Aggregator::with_analyzers(vec![
        Box::new(PanickingAnalyzer),
        Box::new(WorkflowAnalyzer),
    ])
    .run(&config);

    assert_eq!(result.findings, baseline.findings);
    assert_eq!(result.analyzer_faults.len(), 1);
    assert_eq!(result.analyzer_faults[0].analyzer, "panicking");
    assert_eq!(result.analyzer_faults[0].message, "unexpected config shape");
}

#[test]
fn test_parallel_run_matches_sequential() {
    let config = sample_config();
    let sequential = Aggregator::new().run(&config);
    let parallel = Aggregator::new().parallel(true).run(&config);
    assert_eq!(parallel, sequential);
}

#[test]
fn test_repeated_runs_serialize_identically() {
    let config = sample_config();
    let first = serde_json::to_string(&Aggregator::new().run(&config)).unwrap();
    let second = serde_json::to_string(&Aggregator::new().run(&config)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_disabled_analyzers_are_skipped() {
    let settings = OptimizerConfig {
        disabled_analyzers: vec!["cache".to_string(), "orbs".to_string()],
        ..Default::default()
    };
    let aggregator = Aggregator::from_config(&settings);
    assert_eq!(
        aggregator.analyzer_names(),
        vec![
            "resource-class",
            "parallelism",
            "docker-layer-cache",
            "workflow",
            "best-practices"
        ]
    );

    let result = aggregator.run(&sample_config());
    assert!(result
        .findings
        .iter()
        .all(|f| f.category != Category::Cache && f.category != Category::Orbs));
}

#[test]
fn test_equal_findings_keep_analyzer_order() {
    let make =
        |title: &str| Finding::new(Category::Practice, "t", title, Priority::Medium, 50.0, title);
    let result = Aggregator::with_analyzers(vec![
        Box::new(FixedAnalyzer(vec![make("one"), make("two")])),
        Box::new(FixedAnalyzer(vec![make("three")])),
    ])
    .run(&sample_config());

    let titles: Vec<&str> = result.findings.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "two", "three"]);
}

#[test]
fn test_default_analyzer_count() {
    assert_eq!(default_analyzers().len(), 7);
}

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::High),
        Just(Priority::Medium),
        Just(Priority::Low)
    ]
}

proptest! {
    #[test]
    fn prop_sort_is_stable(entries in prop::collection::vec((priority_strategy(), 0u8..4), 0..40)) {
        let mut findings: Vec<Finding> = entries
            .iter()
            .enumerate()
            .map(|(index, (priority, score))| {
                Finding::new(
                    Category::Practice,
                    "t",
                    &index.to_string(),
                    *priority,
                    f64::from(*score) * 10.0,
                    index.to_string(),
                )
            })
            .collect();
        sort_findings(&mut findings);

        for pair in findings.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.priority.rank() <= b.priority.rank());
            if a.priority == b.priority {
                prop_assert!(a.impact_score >= b.impact_score);
                if a.impact_score == b.impact_score {
                    let ia: usize = a.title.parse().unwrap();
                    let ib: usize = b.title.parse().unwrap();
                    prop_assert!(ia < ib);
                }
            }
        }
    }
}
