//! Finding model shared by every analyzer, and the aggregated result.

pub mod scoring;

use crate::errors::AnalyzerFault;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Analyzer family a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Resource,
    Cache,
    Parallel,
    LayerCache,
    Orbs,
    Workflow,
    Practice,
}

impl Category {
    /// Prefix used in finding ids.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::Cache => "cache",
            Self::Parallel => "parallel",
            Self::LayerCache => "docker-layer-cache",
            Self::Orbs => "orbs",
            Self::Workflow => "workflow",
            Self::Practice => "practice",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Resource => "Resource Class",
            Self::Cache => "Caching",
            Self::Parallel => "Parallelism",
            Self::LayerCache => "Docker Layer Caching",
            Self::Orbs => "Orbs",
            Self::Workflow => "Workflow",
            Self::Practice => "Best Practice",
        }
    }
}

/// Severity bucket. Variant order is rank order: `High < Medium < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort rank: high = 0, medium = 1, low = 2.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    /// Whether this priority is at least as urgent as `threshold`.
    pub fn meets(&self, threshold: Priority) -> bool {
        self.rank() <= threshold.rank()
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        };
        write!(f, "{label}")
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!(
                "unknown priority '{other}' (expected high, medium or low)"
            )),
        }
    }
}

/// Heuristic savings attached to a finding.
///
/// `time_reduction` is free text whose units vary between analyzers
/// ("2-5 min", "40-50%").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatedSavings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_reduction_percent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_reduction: Option<String>,
}

impl EstimatedSavings {
    pub fn cost(percent: u32) -> Self {
        Self {
            cost_reduction_percent: Some(percent),
            time_reduction: None,
        }
    }

    pub fn time(text: impl Into<String>) -> Self {
        Self {
            cost_reduction_percent: None,
            time_reduction: Some(text.into()),
        }
    }
}

/// One detected optimization opportunity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub category: Category,
    pub priority: Priority,
    /// Orders findings within one priority bucket only.
    pub impact_score: f64,
    pub title: String,
    pub current_state: String,
    pub problem: String,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_savings: Option<EstimatedSavings>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_jobs: Vec<String>,
}

impl Finding {
    /// Start a finding; the id is `<category>-<rule>-<subject>`.
    pub fn new(
        category: Category,
        rule: &str,
        subject: &str,
        priority: Priority,
        impact_score: f64,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("{}-{}-{}", category.slug(), rule, subject),
            category,
            priority,
            impact_score,
            title: title.into(),
            current_state: String::new(),
            problem: String::new(),
            recommendation: String::new(),
            example: None,
            estimated_savings: None,
            affected_jobs: Vec::new(),
        }
    }

    pub fn current_state(mut self, text: impl Into<String>) -> Self {
        self.current_state = text.into();
        self
    }

    pub fn problem(mut self, text: impl Into<String>) -> Self {
        self.problem = text.into();
        self
    }

    pub fn recommendation(mut self, text: impl Into<String>) -> Self {
        self.recommendation = text.into();
        self
    }

    pub fn example(mut self, text: impl Into<String>) -> Self {
        self.example = Some(text.into());
        self
    }

    pub fn savings(mut self, savings: EstimatedSavings) -> Self {
        self.estimated_savings = Some(savings);
        self
    }

    pub fn affecting<I, S>(mut self, jobs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.affected_jobs = jobs.into_iter().map(Into::into).collect();
        self
    }

    pub fn cost_reduction_percent(&self) -> Option<u32> {
        self.estimated_savings
            .as_ref()
            .and_then(|s| s.cost_reduction_percent)
    }

    pub fn time_reduction(&self) -> Option<&str> {
        self.estimated_savings
            .as_ref()
            .and_then(|s| s.time_reduction.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        findings.iter().fold(Self::default(), |mut counts, f| {
            match f.priority {
                Priority::High => counts.high += 1,
                Priority::Medium => counts.medium += 1,
                Priority::Low => counts.low += 1,
            }
            counts
        })
    }

    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Savings summed across a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsSummary {
    /// Rounded mean of the findings' cost percentages; 0 when none report one.
    pub cost_reduction_percent: u32,
    /// Sum of the leading integers of the time texts, capped.
    pub time_saved: u32,
}

/// Output of one analysis run, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub total_findings: usize,
    pub counts: PriorityCounts,
    pub estimated_savings: SavingsSummary,
    /// Sorted by priority rank, then impact score descending, then emission order.
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub analyzer_faults: Vec<AnalyzerFault>,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn with_priority(&self, priority: Priority) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.priority == priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_rank_order() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
        assert_eq!(Priority::High.rank(), 0);
        assert_eq!(Priority::Low.rank(), 2);
    }

    #[test]
    fn test_priority_meets_threshold() {
        assert!(Priority::High.meets(Priority::Medium));
        assert!(Priority::Medium.meets(Priority::Medium));
        assert!(!Priority::Low.meets(Priority::Medium));
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_finding_id_is_derived_from_category_and_subject() {
        let finding = Finding::new(
            Category::LayerCache,
            "disabled",
            "build",
            Priority::Medium,
            65.0,
            "title",
        );
        assert_eq!(finding.id, "docker-layer-cache-disabled-build");
    }

    #[test]
    fn test_counts_from_findings() {
        let findings = vec![
            Finding::new(Category::Cache, "a", "x", Priority::High, 1.0, "a"),
            Finding::new(Category::Cache, "b", "x", Priority::Low, 1.0, "b"),
            Finding::new(Category::Cache, "c", "x", Priority::Low, 1.0, "c"),
        ];
        let counts = PriorityCounts::from_findings(&findings);
        assert_eq!(counts, PriorityCounts { high: 1, medium: 0, low: 2 });
        assert_eq!(counts.get(Priority::Low), 2);
    }
}
