use super::Analyzer;
use crate::core::scoring::impact;
use crate::core::{Category, EstimatedSavings, Finding, Priority};
use crate::heuristics::examples;
use crate::pipeline::{ConfigTree, Executor, Job, StepKind};

static BUILD_COMMANDS: &[&str] = &[
    "docker build",
    "docker buildx build",
    "docker-compose build",
    "docker compose build",
];

/// Flags image builds that run without Docker layer caching.
pub struct LayerCacheAnalyzer;

impl Analyzer for LayerCacheAnalyzer {
    fn name(&self) -> &'static str {
        "docker-layer-cache"
    }

    fn analyze(&self, config: &ConfigTree) -> Vec<Finding> {
        config
            .jobs
            .iter()
            .filter(|job| builds_image(job) && !layer_caching_enabled(job))
            .map(finding)
            .collect()
    }
}

/// Matches both `run: docker build` and `run: {command: docker build}`,
/// since both serialize the command text into the steps blob.
fn builds_image(job: &Job) -> bool {
    let blob = job.steps_blob().to_ascii_lowercase();
    BUILD_COMMANDS.iter().any(|command| blob.contains(command))
}

fn has_remote_docker(job: &Job) -> bool {
    job.steps
        .iter()
        .any(|step| matches!(step.kind, StepKind::SetupRemoteDocker { .. }))
}

fn layer_caching_enabled(job: &Job) -> bool {
    let from_step = job.steps.iter().any(|step| {
        matches!(
            step.kind,
            StepKind::SetupRemoteDocker {
                layer_caching: true
            }
        )
    });
    let from_machine = matches!(
        job.executor,
        Executor::VirtualMachine {
            layer_caching: true,
            ..
        }
    );
    from_step || from_machine
}

fn finding(job: &Job) -> Finding {
    let current = if has_remote_docker(job) {
        format!(
            "Job '{}' builds a Docker image after setup_remote_docker without docker_layer_caching.",
            job.name
        )
    } else {
        format!(
            "Job '{}' builds a Docker image on a {} executor without layer caching.",
            job.name,
            job.executor.kind_name()
        )
    };

    Finding::new(
        Category::LayerCache,
        "disabled",
        &job.name,
        Priority::Medium,
        impact::LAYER_CACHE,
        format!("Docker layer caching is off in job '{}'", job.name),
    )
    .current_state(current)
    .problem("Every build starts from an empty layer cache and rebuilds unchanged layers.")
    .recommendation(
        "Enable docker_layer_caching on setup_remote_docker (or the machine executor) \
         and order the Dockerfile so rarely changing layers come first.",
    )
    .example(examples::layer_caching())
    .savings(EstimatedSavings::time("3-8 min"))
    .affecting([job.name.as_str()])
}
