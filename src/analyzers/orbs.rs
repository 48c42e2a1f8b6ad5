//! Suggests orbs for hand-rolled steps that an official orb already covers.

use super::Analyzer;
use crate::core::scoring::impact;
use crate::core::{Category, Finding, Priority};
use crate::heuristics::examples;
use crate::pipeline::{orb_namespace, ConfigTree, Job};
use once_cell::sync::Lazy;
use regex::Regex;

struct OrbPattern {
    slug: &'static str,
    pattern: Regex,
    reference: &'static str,
    display_name: &'static str,
}

static ORB_PATTERNS: Lazy<Vec<OrbPattern>> = Lazy::new(|| {
    vec![
        OrbPattern {
            slug: "aws-cli",
            pattern: Regex::new(r"\baws\s+[a-z0-9-]+").expect("valid regex"),
            reference: "circleci/aws-cli@4.1",
            display_name: "AWS CLI",
        },
        OrbPattern {
            slug: "slack",
            pattern: Regex::new(r"hooks\.slack\.com|\bslack\b").expect("valid regex"),
            reference: "circleci/slack@4.13",
            display_name: "Slack",
        },
        OrbPattern {
            slug: "node",
            pattern: Regex::new(r"\b(npm|yarn|pnpm)\s+(install|ci)\b").expect("valid regex"),
            reference: "circleci/node@5.2",
            display_name: "Node.js",
        },
    ]
});

pub struct OrbsAnalyzer;

impl Analyzer for OrbsAnalyzer {
    fn name(&self) -> &'static str {
        "orbs"
    }

    fn analyze(&self, config: &ConfigTree) -> Vec<Finding> {
        let mut findings = Vec::new();
        for job in &config.jobs {
            let blob = job.steps_blob().to_ascii_lowercase();
            for orb in ORB_PATTERNS.iter() {
                if orb.pattern.is_match(&blob)
                    && !config.declares_orb_namespace(orb_namespace(orb.reference))
                {
                    findings.push(suggestion(job, orb));
                }
            }
        }
        findings
    }
}

fn suggestion(job: &Job, orb: &OrbPattern) -> Finding {
    Finding::new(
        Category::Orbs,
        orb.slug,
        &job.name,
        Priority::Low,
        impact::REUSABLE_COMPONENT,
        format!("Use the {} orb in job '{}'", orb.display_name, job.name),
    )
    .current_state(format!(
        "Job '{}' hand-writes {} steps and no {} orb is declared.",
        job.name,
        orb.display_name,
        orb_namespace(orb.reference)
    ))
    .problem("Hand-rolled setup drifts between jobs and misses fixes the maintained orb ships.")
    .recommendation(format!(
        "Declare {} and replace the custom commands with its jobs and commands.",
        orb.reference
    ))
    .example(examples::orb_usage(orb.slug, orb.reference))
    .affecting([job.name.as_str()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::tree;
    use indoc::indoc;

    #[test]
    fn test_suggests_each_matching_orb_per_job() {
        let config = tree(indoc! {"
            jobs:
              deploy:
                steps:
                  - run: npm ci
                  - run: aws s3 sync build s3://bucket
                  - run: curl -X POST https://hooks.slack.com/services/T0/B0/X
        "});
        let findings = OrbsAnalyzer.analyze(&config);
        let ids: Vec<&str> = findings.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["orbs-aws-cli-deploy", "orbs-slack-deploy", "orbs-node-deploy"]);
        assert!(findings.iter().all(|f| f.priority == Priority::Low));
        assert!(findings.iter().all(|f| f.impact_score == 40.0));
    }

    #[test]
    fn test_declared_namespace_suppresses_suggestion() {
        let config = tree(indoc! {"
            orbs:
              aws: circleci/aws-cli@3.0.0
            jobs:
              deploy:
                steps:
                  - run: aws ecr get-login-password
        "});
        assert!(OrbsAnalyzer.analyze(&config).is_empty());
    }

    #[test]
    fn test_unrelated_orb_does_not_suppress() {
        let config = tree(indoc! {"
            orbs:
              node: circleci/node@5.2
            jobs:
              notify:
                steps:
                  - run: ./notify-slack.sh
        "});
        let findings = OrbsAnalyzer.analyze(&config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "orbs-slack-notify");
    }
}
