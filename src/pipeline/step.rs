//! Job steps as capability-tagged nodes.
//!
//! CircleCI steps have no closed schema: orb commands, custom commands and
//! built-ins all share the same list. Known capabilities are recognized into
//! [`StepKind`] variants; everything else lands in [`StepKind::Other`]. Every
//! step keeps its raw YAML node so heuristics can match on its serialized text.

use serde_yaml::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub kind: StepKind,
    raw: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// `run:` in either its string or `{command: ...}` form
    Run {
        name: Option<String>,
        command: String,
    },
    /// `restore_cache:` with either `key:` or `keys:`
    RestoreCache { keys: Vec<String> },
    /// `save_cache:`
    SaveCache,
    /// `setup_remote_docker`, bare or with options
    SetupRemoteDocker { layer_caching: bool },
    /// A node declaring `type: approval`
    Approval,
    /// `checkout`, orb commands, custom commands and unrecognized shapes
    Other { name: Option<String> },
}

impl Step {
    /// Recognize a raw step node.
    pub fn from_node(node: &Value) -> Self {
        Self {
            kind: classify(node),
            raw: node.clone(),
        }
    }

    /// The step's raw node serialized as compact text.
    pub fn serialized(&self) -> String {
        serde_json::to_string(&self.raw)
            .or_else(|_| serde_yaml::to_string(&self.raw).map(|s| s.trim_end().to_string()))
            .unwrap_or_default()
    }

    /// A short label for reports: the step's name, command or capability.
    pub fn label(&self) -> String {
        match &self.kind {
            StepKind::Run { name: Some(name), .. } => name.clone(),
            StepKind::Run { command, .. } => {
                command.lines().next().unwrap_or_default().trim().to_string()
            }
            StepKind::RestoreCache { .. } => "restore_cache".to_string(),
            StepKind::SaveCache => "save_cache".to_string(),
            StepKind::SetupRemoteDocker { .. } => "setup_remote_docker".to_string(),
            StepKind::Approval => "approval".to_string(),
            StepKind::Other { name } => name.clone().unwrap_or_else(|| "step".to_string()),
        }
    }
}

fn classify(node: &Value) -> StepKind {
    match node {
        Value::String(name) => classify_bare(name),
        Value::Mapping(map) => {
            if map.get("type").and_then(Value::as_str) == Some("approval") {
                return StepKind::Approval;
            }
            match single_entry(map) {
                Some((name, body)) => classify_entry(name, body),
                None => StepKind::Other { name: None },
            }
        }
        _ => StepKind::Other { name: None },
    }
}

fn classify_bare(name: &str) -> StepKind {
    match name {
        "setup_remote_docker" => StepKind::SetupRemoteDocker {
            layer_caching: false,
        },
        _ => StepKind::Other {
            name: Some(name.to_string()),
        },
    }
}

fn classify_entry(name: &str, body: &Value) -> StepKind {
    match name {
        "run" => classify_run(body),
        "restore_cache" => StepKind::RestoreCache {
            keys: cache_keys(body),
        },
        "save_cache" => StepKind::SaveCache,
        "setup_remote_docker" => StepKind::SetupRemoteDocker {
            layer_caching: body
                .get("docker_layer_caching")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        },
        _ => StepKind::Other {
            name: Some(name.to_string()),
        },
    }
}

fn classify_run(body: &Value) -> StepKind {
    match body {
        Value::String(command) => StepKind::Run {
            name: None,
            command: command.clone(),
        },
        Value::Mapping(_) => StepKind::Run {
            name: body.get("name").and_then(Value::as_str).map(String::from),
            command: body
                .get("command")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        _ => StepKind::Run {
            name: None,
            command: String::new(),
        },
    }
}

fn cache_keys(body: &Value) -> Vec<String> {
    let mut keys = string_list(body.get("keys"));
    if let Some(key) = body.get("key").and_then(Value::as_str) {
        keys.insert(0, key.to_string());
    }
    keys
}

fn single_entry(map: &serde_yaml::Mapping) -> Option<(&str, &Value)> {
    let mut entries = map.iter();
    let (key, value) = entries.next()?;
    if entries.next().is_some() {
        return None;
    }
    key.as_str().map(|key| (key, value))
}

/// A string or a sequence of strings; anything else yields nothing.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(yaml: &str) -> Step {
        let node: Value = serde_yaml::from_str(yaml).unwrap();
        Step::from_node(&node)
    }

    #[test]
    fn test_run_string_form() {
        let s = step("run: npm ci");
        assert_eq!(
            s.kind,
            StepKind::Run {
                name: None,
                command: "npm ci".to_string()
            }
        );
    }

    #[test]
    fn test_run_structured_form() {
        let s = step("run:\n  name: Build image\n  command: docker build .");
        assert_eq!(
            s.kind,
            StepKind::Run {
                name: Some("Build image".to_string()),
                command: "docker build .".to_string()
            }
        );
        assert_eq!(s.label(), "Build image");
    }

    #[test]
    fn test_restore_cache_single_key_and_key_list() {
        let single = step("restore_cache:\n  key: v1-deps");
        assert_eq!(
            single.kind,
            StepKind::RestoreCache {
                keys: vec!["v1-deps".to_string()]
            }
        );

        let list = step("restore_cache:\n  keys:\n    - v1-a\n    - v1-");
        assert_eq!(
            list.kind,
            StepKind::RestoreCache {
                keys: vec!["v1-a".to_string(), "v1-".to_string()]
            }
        );
    }

    #[test]
    fn test_setup_remote_docker_forms() {
        assert_eq!(
            step("setup_remote_docker").kind,
            StepKind::SetupRemoteDocker {
                layer_caching: false
            }
        );
        assert_eq!(
            step("setup_remote_docker:\n  docker_layer_caching: true").kind,
            StepKind::SetupRemoteDocker {
                layer_caching: true
            }
        );
    }

    #[test]
    fn test_unrecognized_shapes_keep_raw_node() {
        let orb = step("node/install-packages:\n  pkg-manager: npm");
        assert_eq!(
            orb.kind,
            StepKind::Other {
                name: Some("node/install-packages".to_string())
            }
        );
        assert!(orb.serialized().contains("pkg-manager"));

        let odd = step("- 1\n- 2");
        assert_eq!(odd.kind, StepKind::Other { name: None });
        assert_eq!(odd.serialized(), "[1,2]");
    }

    #[test]
    fn test_checkout_is_other() {
        assert_eq!(
            step("checkout").kind,
            StepKind::Other {
                name: Some("checkout".to_string())
            }
        );
    }
}
