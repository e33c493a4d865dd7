//! The per-task pipeline: acquire, check manifest, prepare, verify, clean up.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::RunnerConfig;
use crate::context::ServiceContext;
use crate::error::{AcquisitionStep, RunError};
use crate::ports::{FileSystem, Invocation};
use crate::task::{Task, TaskOutcome, TaskResult};

/// A configured external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Program name or path.
    pub program: String,
    /// Arguments placed before any task-specific ones.
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Builds the invocation of this command in `cwd`.
    #[must_use]
    pub fn invocation(&self, cwd: &Path) -> Invocation {
        Invocation::new(self.program.clone(), cwd).args(self.args.iter().cloned())
    }
}

/// Which manifest to read and which dependency proves the checker is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCheck {
    /// Manifest path relative to the working copy.
    pub file: String,
    /// Dependency name the manifest must list.
    pub dependency: String,
}

impl Default for ManifestCheck {
    fn default() -> Self {
        Self { file: "package.json".to_string(), dependency: "standard".to_string() }
    }
}

/// Result of inspecting a working copy's manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestStatus {
    /// The manifest lists the dependency, or cannot rule it out.
    Uses,
    /// Both dependency tables exist and neither lists the dependency.
    DoesNotUse,
    /// The manifest is missing or malformed.
    Unreadable(String),
}

/// Inspects the manifest of the working copy at `workdir`.
#[must_use]
pub fn inspect_manifest(
    fs: &dyn FileSystem,
    workdir: &Path,
    check: &ManifestCheck,
) -> ManifestStatus {
    let path = workdir.join(&check.file);
    let contents = match fs.read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => return ManifestStatus::Unreadable(format!("could not read {}: {e}", check.file)),
    };
    let manifest: serde_json::Value = match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(e) => return ManifestStatus::Unreadable(format!("could not parse {}: {e}", check.file)),
    };

    let lacks = |table: &str| {
        manifest
            .get(table)
            .and_then(serde_json::Value::as_object)
            .is_some_and(|deps| !deps.contains_key(&check.dependency))
    };
    if lacks("dependencies") && lacks("devDependencies") {
        ManifestStatus::DoesNotUse
    } else {
        ManifestStatus::Uses
    }
}

/// Runs one task to completion.
///
/// Only acquisition failures are returned as errors; everything else is
/// folded into the task's outcome.
pub(crate) async fn execute(
    ctx: ServiceContext,
    config: Arc<RunnerConfig>,
    task: Task,
) -> Result<TaskResult, RunError> {
    let started = ctx.clock.now();
    let outcome = run_stages(&ctx, &config, &task).await?;
    let elapsed = ctx.clock.now() - started;

    Ok(TaskResult {
        name: task.name,
        source: task.source,
        outcome,
        duration_ms: u64::try_from(elapsed.num_milliseconds()).unwrap_or(0),
    })
}

async fn run_stages(
    ctx: &ServiceContext,
    config: &RunnerConfig,
    task: &Task,
) -> Result<TaskOutcome, RunError> {
    let present = ctx.fs.is_accessible(&task.workdir);

    if config.offline {
        if !present {
            debug!(task = %task.name, "offline and no local copy");
            return Ok(TaskOutcome::Skipped { reason: "offline: no local copy".to_string() });
        }
    } else {
        acquire(ctx, task, present).await?;
    }

    if let Some(check) = &config.manifest {
        match inspect_manifest(ctx.fs.as_ref(), &task.workdir, check) {
            ManifestStatus::Uses => {}
            ManifestStatus::DoesNotUse => {
                return Ok(TaskOutcome::Skipped {
                    reason: format!("does not use {}", check.dependency),
                });
            }
            ManifestStatus::Unreadable(reason) => {
                warn!(task = %task.name, %reason, "unusable manifest");
                return Ok(TaskOutcome::Skipped { reason });
            }
        }
    }

    if let Some(prepare) = &config.prepare {
        prepare_copy(ctx, task, prepare).await;
    }

    let outcome = verify(ctx, config, task).await;

    if let Err(e) = ctx.vcs.reset_hard(&task.workdir).await {
        warn!(task = %task.name, error = %e, "cleanup failed");
    }

    Ok(outcome)
}

async fn acquire(ctx: &ServiceContext, task: &Task, present: bool) -> Result<(), RunError> {
    let (step, result) = if present {
        debug!(task = %task.name, "updating working copy");
        (AcquisitionStep::Pull, ctx.vcs.pull(&task.workdir).await)
    } else {
        debug!(task = %task.name, source = %task.source, "cloning working copy");
        (AcquisitionStep::Clone, ctx.vcs.clone_shallow(&task.source, &task.workdir).await)
    };

    result.map_err(|e| RunError::Acquisition {
        task: task.name.clone(),
        locator: task.source.clone(),
        step,
        cause: e.to_string(),
    })
}

async fn prepare_copy(ctx: &ServiceContext, task: &Task, prepare: &CommandSpec) {
    let invocation = prepare.invocation(&task.workdir);
    let command = invocation.display_line();
    match ctx.process.run(&invocation).await {
        Ok(exit) if exit.success() => {}
        Ok(exit) => warn!(task = %task.name, %command, code = ?exit.code, "preparation failed"),
        Err(e) => warn!(task = %task.name, %command, error = %e, "preparation failed"),
    }
}

async fn verify(ctx: &ServiceContext, config: &RunnerConfig, task: &Task) -> TaskOutcome {
    let invocation = config.checker.invocation(&task.workdir).args(task.args.iter().cloned());
    debug!(task = %task.name, command = %invocation.display_line(), "running checker");

    match ctx.process.run(&invocation).await {
        Ok(exit) if exit.success() => TaskOutcome::Passed,
        Ok(exit) => TaskOutcome::Failed {
            exit_code: exit.code,
            reason: match exit.code {
                Some(code) => format!("non-zero exit code: {code}"),
                None => "terminated by signal".to_string(),
            },
        },
        Err(e) => TaskOutcome::Failed { exit_code: None, reason: e.to_string() },
    }
}
