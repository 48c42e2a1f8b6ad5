//! YAML → [`ConfigTree`] mapping.
//!
//! Only the minimal shape is validated: the document must be a mapping with a
//! non-empty `jobs` mapping. Every optional field that is missing or of an
//! unexpected type is treated as absent.

use super::step::{string_list, Step};
use super::{ConfigTree, Executor, Job, JobReference, JobReferenceKind, OrbDeclaration, Workflow};
use crate::errors::LoadError;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read and parse the configuration at `path`.
pub fn load_config_file(path: &Path) -> Result<ConfigTree, LoadError> {
    let contents = fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))?;
    let tree = parse_config(&contents)?;
    debug!(
        path = %path.display(),
        jobs = tree.jobs.len(),
        workflows = tree.workflows.len(),
        "Loaded pipeline configuration"
    );
    Ok(tree)
}

/// Parse configuration text.
pub fn parse_config(text: &str) -> Result<ConfigTree, LoadError> {
    let mut document: Value = serde_yaml::from_str(text).map_err(LoadError::from_yaml)?;
    document.apply_merge().map_err(LoadError::from_yaml)?;

    let root = document
        .as_mapping()
        .ok_or_else(|| LoadError::structurally_invalid("the document root is not a mapping"))?;

    let jobs = parse_jobs(root)?;
    let workflows = root
        .get("workflows")
        .and_then(Value::as_mapping)
        .map(parse_workflows)
        .unwrap_or_default();
    let orbs = root
        .get("orbs")
        .and_then(Value::as_mapping)
        .map(parse_orbs)
        .unwrap_or_default();

    Ok(ConfigTree {
        jobs,
        workflows,
        orbs,
    })
}

fn parse_jobs(root: &Mapping) -> Result<Vec<Job>, LoadError> {
    let jobs = match root.get("jobs") {
        Some(Value::Mapping(jobs)) => jobs,
        Some(_) => {
            return Err(LoadError::structurally_invalid(
                "`jobs` must be a mapping of job names to job definitions",
            ))
        }
        None => return Err(LoadError::structurally_invalid("no jobs defined")),
    };

    let parsed: Vec<Job> = jobs
        .iter()
        .filter_map(|(name, body)| name.as_str().map(|name| parse_job(name, body)))
        .collect();

    if parsed.is_empty() {
        return Err(LoadError::structurally_invalid("no jobs defined"));
    }
    Ok(parsed)
}

fn parse_job(name: &str, body: &Value) -> Job {
    Job {
        name: name.to_string(),
        executor: parse_executor(body),
        resource_class: body
            .get("resource_class")
            .and_then(Value::as_str)
            .map(String::from),
        parallelism: body.get("parallelism").and_then(Value::as_u64),
        steps: body
            .get("steps")
            .and_then(Value::as_sequence)
            .map(|steps| steps.iter().map(Step::from_node).collect())
            .unwrap_or_default(),
    }
}

fn parse_executor(body: &Value) -> Executor {
    if let Some(images) = body.get("docker") {
        let image = images
            .as_sequence()
            .and_then(|images| images.first())
            .and_then(|primary| primary.get("image"))
            .and_then(Value::as_str)
            .map(String::from);
        return Executor::Container { image };
    }

    if let Some(machine) = body.get("machine") {
        return match machine {
            Value::Mapping(_) => Executor::VirtualMachine {
                image: machine.get("image").and_then(Value::as_str).map(String::from),
                layer_caching: machine
                    .get("docker_layer_caching")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            },
            _ => Executor::VirtualMachine {
                image: None,
                layer_caching: false,
            },
        };
    }

    if body.get("macos").is_some() {
        return Executor::HostOs;
    }

    Executor::Unknown
}

fn parse_workflows(workflows: &Mapping) -> Vec<Workflow> {
    workflows
        .iter()
        .filter_map(|(name, body)| {
            let name = name.as_str()?;
            let body = body.as_mapping()?;
            Some(Workflow {
                name: name.to_string(),
                jobs: body
                    .get("jobs")
                    .and_then(Value::as_sequence)
                    .map(|jobs| jobs.iter().filter_map(parse_job_reference).collect())
                    .unwrap_or_default(),
            })
        })
        .collect()
}

fn parse_job_reference(node: &Value) -> Option<JobReference> {
    match node {
        Value::String(name) => Some(JobReference::named(name.clone())),
        Value::Mapping(map) => {
            let (name, options) = map.iter().next()?;
            let name = name.as_str()?;
            let kind = match options.get("type").and_then(Value::as_str) {
                Some("approval") => JobReferenceKind::Approval,
                _ => JobReferenceKind::Normal,
            };
            Some(JobReference {
                name: name.to_string(),
                requires: string_list(options.get("requires")),
                kind,
            })
        }
        _ => None,
    }
}

fn parse_orbs(orbs: &Mapping) -> Vec<OrbDeclaration> {
    orbs.iter()
        .filter_map(|(_, reference)| {
            Some(OrbDeclaration {
                reference: reference.as_str()?.to_string(),
            })
        })
        .collect()
}
