//! Read-only model of a CircleCI configuration document.
//!
//! The tree is built once by [`loader`] and shared immutably with every
//! analyzer. Jobs and workflows keep their document order so that analyzer
//! output, and therefore tie-breaking in the final sort, is deterministic.

pub mod loader;
pub mod step;

pub use loader::{load_config_file, parse_config};
pub use step::{Step, StepKind};

use crate::core::scoring::DEFAULT_RESOURCE_CLASS;

/// Parsed pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTree {
    /// Jobs in document order; names are unique.
    pub jobs: Vec<Job>,
    /// Workflows in document order; empty when the document declares none.
    pub workflows: Vec<Workflow>,
    /// Declared orbs in document order.
    pub orbs: Vec<OrbDeclaration>,
}

impl ConfigTree {
    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.name == name)
    }

    pub fn workflow(&self, name: &str) -> Option<&Workflow> {
        self.workflows.iter().find(|workflow| workflow.name == name)
    }

    /// True when any declared orb reference lives in `namespace`
    /// (the part of a reference before `@`, e.g. `circleci/node`).
    pub fn declares_orb_namespace(&self, namespace: &str) -> bool {
        self.orbs.iter().any(|orb| orb.namespace() == namespace)
    }
}

/// The reference of a top-level `orbs:` entry; the alias key is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbDeclaration {
    pub reference: String,
}

impl OrbDeclaration {
    pub fn namespace(&self) -> &str {
        orb_namespace(&self.reference)
    }
}

/// Strip the version from an orb reference: `circleci/node@5.2` → `circleci/node`.
pub fn orb_namespace(reference: &str) -> &str {
    reference.split('@').next().unwrap_or(reference)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub name: String,
    pub executor: Executor,
    /// Declared `resource_class`, if any.
    pub resource_class: Option<String>,
    /// Declared `parallelism`, if any.
    pub parallelism: Option<u64>,
    pub steps: Vec<Step>,
}

impl Job {
    /// The effective resource class, falling back to CircleCI's default.
    pub fn tier(&self) -> &str {
        self.resource_class
            .as_deref()
            .unwrap_or(DEFAULT_RESOURCE_CLASS)
    }

    /// Whether a parallelism factor above one is configured.
    pub fn is_parallelized(&self) -> bool {
        self.parallelism.is_some_and(|p| p > 1)
    }

    /// All steps serialized into one text blob for heuristic matching.
    ///
    /// Matching against this blob is a signal, not proof: it sees command
    /// text, step names and cache keys alike.
    pub fn steps_blob(&self) -> String {
        let parts: Vec<String> = self.steps.iter().map(Step::serialized).collect();
        format!("[{}]", parts.join(","))
    }
}

/// How a job is executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Executor {
    /// `docker:` executor; `image` is the primary (first) image.
    Container { image: Option<String> },
    /// `machine:` executor.
    VirtualMachine {
        image: Option<String>,
        layer_caching: bool,
    },
    /// `macos:` executor.
    HostOs,
    /// Anything else, including references to named executors.
    Unknown,
}

impl Executor {
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container { .. })
    }

    pub fn image(&self) -> Option<&str> {
        match self {
            Self::Container { image } | Self::VirtualMachine { image, .. } => image.as_deref(),
            Self::HostOs | Self::Unknown => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Container { .. } => "docker",
            Self::VirtualMachine { .. } => "machine",
            Self::HostOs => "macos",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    pub name: String,
    pub jobs: Vec<JobReference>,
}

impl Workflow {
    pub fn has_approval_gate(&self) -> bool {
        self.jobs
            .iter()
            .any(|job| job.kind == JobReferenceKind::Approval)
    }

    /// References that do not wait on any other job.
    pub fn independent_jobs(&self) -> impl Iterator<Item = &JobReference> {
        self.jobs.iter().filter(|job| job.requires.is_empty())
    }
}

/// One entry in a workflow's `jobs:` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReference {
    pub name: String,
    /// Prerequisite job names from `requires:`; empty when absent.
    pub requires: Vec<String>,
    pub kind: JobReferenceKind,
}

impl JobReference {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            kind: JobReferenceKind::Normal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobReferenceKind {
    Normal,
    Approval,
}
