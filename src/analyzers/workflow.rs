use super::Analyzer;
use crate::core::scoring::impact;
use crate::core::{Category, Finding, Priority};
use crate::heuristics::examples;
use crate::pipeline::{ConfigTree, Workflow};

/// Workflows with more jobs than this should pause for approval somewhere.
const APPROVAL_JOB_THRESHOLD: usize = 3;

/// Workflow structure checks.
pub struct WorkflowAnalyzer;

impl Analyzer for WorkflowAnalyzer {
    fn name(&self) -> &'static str {
        "workflow"
    }

    fn analyze(&self, config: &ConfigTree) -> Vec<Finding> {
        config
            .workflows
            .iter()
            .filter(|wf| wf.jobs.len() > APPROVAL_JOB_THRESHOLD && !wf.has_approval_gate())
            .map(missing_approval)
            .collect()
    }
}

fn missing_approval(workflow: &Workflow) -> Finding {
    let last = workflow
        .jobs
        .last()
        .map(|job| job.name.as_str())
        .unwrap_or("deploy");

    Finding::new(
        Category::Workflow,
        "approval",
        &workflow.name,
        Priority::Low,
        impact::APPROVAL_GATE,
        format!("Workflow '{}' has no approval gate", workflow.name),
    )
    .current_state(format!(
        "Workflow '{}' chains {} jobs without a `type: approval` step.",
        workflow.name,
        workflow.jobs.len()
    ))
    .problem(
        "Long workflows run to completion, including release or deploy jobs, with no manual checkpoint.",
    )
    .recommendation(format!(
        "Add an approval job before '{last}' so risky stages wait for a person to confirm."
    ))
    .example(examples::approval_gate(&workflow.name, last))
    .affecting(workflow.jobs.iter().map(|job| job.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::tree;
    use indoc::indoc;

    #[test]
    fn test_five_jobs_without_approval() {
        let config = tree(indoc! {"
            jobs:
              build: {}
            workflows:
              release:
                jobs: [build, test, package, publish, deploy]
        "});
        let findings = WorkflowAnalyzer.analyze(&config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "workflow-approval-release");
        assert_eq!(findings[0].priority, Priority::Low);
        assert_eq!(findings[0].impact_score, 30.0);
        assert!(findings[0].recommendation.contains("deploy"));
    }

    #[test]
    fn test_three_jobs_is_below_threshold() {
        let config = tree(indoc! {"
            jobs:
              build: {}
            workflows:
              small:
                jobs: [build, test, deploy]
        "});
        assert!(WorkflowAnalyzer.analyze(&config).is_empty());
    }

    #[test]
    fn test_four_jobs_crosses_threshold() {
        let config = tree(indoc! {"
            jobs:
              build: {}
            workflows:
              ship:
                jobs: [build, test, package, deploy]
        "});
        let findings = WorkflowAnalyzer.analyze(&config);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].id, "workflow-approval-ship");
        assert_eq!(findings[0].affected_jobs.len(), 4);
    }

    #[test]
    fn test_approval_gate_present() {
        let config = tree(indoc! {"
            jobs:
              build: {}
            workflows:
              release:
                jobs:
                  - build
                  - test
                  - hold:
                      type: approval
                  - publish
                  - deploy
        "});
        assert!(WorkflowAnalyzer.analyze(&config).is_empty());
    }
}
