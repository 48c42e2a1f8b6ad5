//! Detection rules over a [`ConfigTree`].
//!
//! Each analyzer is stateless and pure: it reads the tree and returns the
//! findings it detected, in a deterministic order. Missing optional data
//! yields fewer findings, never an error.

use crate::core::Finding;
use crate::pipeline::ConfigTree;

pub mod best_practices;
pub mod cache;
pub mod layer_cache;
pub mod orbs;
pub mod parallelism;
pub mod resource_class;
pub mod workflow;

pub use best_practices::BestPracticesAnalyzer;
pub use cache::CacheAnalyzer;
pub use layer_cache::LayerCacheAnalyzer;
pub use orbs::OrbsAnalyzer;
pub use parallelism::ParallelismAnalyzer;
pub use resource_class::ResourceClassAnalyzer;
pub use workflow::WorkflowAnalyzer;

/// A single check over the parsed config, producing zero or more findings.
pub trait Analyzer: Send + Sync {
    /// Stable name used in logs, fault reports and `disabled_analyzers`.
    fn name(&self) -> &'static str;

    fn analyze(&self, config: &ConfigTree) -> Vec<Finding>;
}

/// The built-in analyzers in execution order.
pub fn default_analyzers() -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(ResourceClassAnalyzer),
        Box::new(CacheAnalyzer),
        Box::new(ParallelismAnalyzer),
        Box::new(LayerCacheAnalyzer),
        Box::new(OrbsAnalyzer),
        Box::new(WorkflowAnalyzer),
        Box::new(BestPracticesAnalyzer),
    ]
}

pub fn analyzer_names() -> Vec<&'static str> {
    default_analyzers().iter().map(|a| a.name()).collect()
}
