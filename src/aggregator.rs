//! Runs the analyzer set and folds its output into an [`AnalysisResult`].
//!
//! Each analyzer executes inside its own fault boundary. A panicking analyzer
//! contributes no findings and is reported as an [`AnalyzerFault`]; the other
//! analyzers' findings are unaffected.

use crate::analyzers::{default_analyzers, Analyzer};
use crate::config::OptimizerConfig;
use crate::core::scoring::TIME_SAVINGS_CAP;
use crate::core::{AnalysisResult, Finding, PriorityCounts, SavingsSummary};
use crate::errors::AnalyzerFault;
use crate::heuristics::leading_integer;
use crate::pipeline::ConfigTree;
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

type Outcome = Result<Vec<Finding>, AnalyzerFault>;

/// Runs a set of analyzers over one config and merges their findings.
pub struct Aggregator {
    analyzers: Vec<Box<dyn Analyzer>>,
    parallel: bool,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    /// All built-in analyzers, run sequentially.
    pub fn new() -> Self {
        Self::with_analyzers(default_analyzers())
    }

    pub fn with_analyzers(analyzers: Vec<Box<dyn Analyzer>>) -> Self {
        Self {
            analyzers,
            parallel: false,
        }
    }

    /// Built-in analyzers minus those disabled in `config`.
    pub fn from_config(config: &OptimizerConfig) -> Self {
        let analyzers: Vec<Box<dyn Analyzer>> = default_analyzers()
            .into_iter()
            .filter(|analyzer| !config.is_disabled(analyzer.name()))
            .collect();
        Self::with_analyzers(analyzers).parallel(config.parallel)
    }

    /// Run analyzers on the rayon pool. Output is identical either way.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn analyzer_names(&self) -> Vec<&'static str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    pub fn run(&self, config: &ConfigTree) -> AnalysisResult {
        let outcomes: Vec<Outcome> = if self.parallel {
            self.analyzers
                .par_iter()
                .map(|analyzer| run_isolated(analyzer.as_ref(), config))
                .collect()
        } else {
            self.analyzers
                .iter()
                .map(|analyzer| run_isolated(analyzer.as_ref(), config))
                .collect()
        };

        let mut findings = Vec::new();
        let mut faults = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(batch) => findings.extend(batch),
                Err(fault) => {
                    warn!(analyzer = %fault.analyzer, "{fault}; continuing without its findings");
                    faults.push(fault);
                }
            }
        }

        sort_findings(&mut findings);
        let result = summarize(findings, faults);
        info!(
            total = result.total_findings,
            high = result.counts.high,
            medium = result.counts.medium,
            low = result.counts.low,
            "Analysis complete"
        );
        result
    }
}

fn run_isolated(analyzer: &dyn Analyzer, config: &ConfigTree) -> Outcome {
    match panic::catch_unwind(AssertUnwindSafe(|| analyzer.analyze(config))) {
        Ok(findings) => {
            debug!(
                analyzer = analyzer.name(),
                findings = findings.len(),
                "Analyzer finished"
            );
            Ok(findings)
        }
        Err(payload) => Err(AnalyzerFault::new(
            analyzer.name(),
            panic_message(payload.as_ref()),
        )),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "analyzer panicked".to_string()
    }
}

/// Priority rank ascending, then impact score descending.
///
/// `sort_by` is stable, so findings that tie on both keys keep the order
/// they were emitted in.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| b.impact_score.total_cmp(&a.impact_score))
    });
}

/// Build the result from already sorted findings.
pub fn summarize(findings: Vec<Finding>, faults: Vec<AnalyzerFault>) -> AnalysisResult {
    AnalysisResult {
        total_findings: findings.len(),
        counts: PriorityCounts::from_findings(&findings),
        estimated_savings: total_savings(&findings),
        findings,
        analyzer_faults: faults,
    }
}

pub fn total_savings(findings: &[Finding]) -> SavingsSummary {
    let costs: Vec<u32> = findings
        .iter()
        .filter_map(Finding::cost_reduction_percent)
        .collect();
    let cost_reduction_percent = if costs.is_empty() {
        0
    } else {
        let mean = costs.iter().map(|&c| f64::from(c)).sum::<f64>() / costs.len() as f64;
        mean.round().clamp(0.0, 100.0) as u32
    };

    // Units differ between texts ("2-5 min" vs "40-50%"); only the leading
    // integer is summed.
    let time_saved = findings
        .iter()
        .filter_map(Finding::time_reduction)
        .filter_map(leading_integer)
        .fold(0u32, |total, n| total.saturating_add(n))
        .min(TIME_SAVINGS_CAP);

    SavingsSummary {
        cost_reduction_percent,
        time_saved,
    }
}
