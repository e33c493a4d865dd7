//! Bounded-concurrency batch runner.
//!
//! Tasks are admitted from a pending queue, in submission order, into a
//! [`JoinSet`] that never holds more than the configured limit. Each
//! completion admits at most one pending task. A fatal acquisition error
//! stops admission; tasks already in flight are drained and their results
//! dropped before the error is returned.

pub mod pipeline;
pub mod progress;
pub mod report;

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{error, info};
use uuid::Uuid;

use crate::context::ServiceContext;
use crate::error::RunError;
use crate::task::{DisabledTask, Task};

pub use pipeline::{inspect_manifest, CommandSpec, ManifestCheck, ManifestStatus};
pub use progress::{ConsoleProgress, ProgressObserver};
pub use report::{RunReport, Tally};

/// Runner settings fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Maximum number of tasks in flight.
    pub limit: NonZeroUsize,
    /// Skip all network access; tasks without a local copy are skipped.
    pub offline: bool,
    /// Shared parent of every task's working copy.
    pub scratch_dir: PathBuf,
    /// The checker; task arguments are appended to its own.
    pub checker: CommandSpec,
    /// Best-effort command run in the working copy before the checker.
    pub prepare: Option<CommandSpec>,
    /// Manifest inspected before the checker runs.
    pub manifest: Option<ManifestCheck>,
}

/// Executes a batch of tasks with bounded parallelism.
pub struct Runner {
    ctx: ServiceContext,
    config: Arc<RunnerConfig>,
}

impl Runner {
    /// Creates a runner over the given adapters.
    #[must_use]
    pub fn new(ctx: ServiceContext, config: RunnerConfig) -> Self {
        Self { ctx, config: Arc::new(config) }
    }

    /// The settings this runner was built with.
    #[must_use]
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Runs every enabled task and collects the report.
    ///
    /// Disabled tasks are passed to `observer` once, before anything runs,
    /// and never executed. Each finished task is passed to `observer` as it
    /// completes.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: a failed clone or pull, an
    /// uncreatable scratch directory, or a task that panicked. No report is
    /// produced in that case.
    pub async fn run(
        &self,
        tasks: Vec<Task>,
        observer: &dyn ProgressObserver,
    ) -> Result<RunReport, RunError> {
        let started_at = self.ctx.clock.now();
        let (disabled, enabled): (Vec<Task>, Vec<Task>) =
            tasks.into_iter().partition(Task::is_disabled);

        let disabled: Vec<DisabledTask> = disabled
            .into_iter()
            .map(|task| DisabledTask {
                reason: task.disabled.unwrap_or_default(),
                name: task.name,
                source: task.source,
            })
            .collect();
        observer.disabled(&disabled);

        if !enabled.is_empty() {
            self.ctx.fs.create_dir_all(&self.config.scratch_dir).map_err(|e| {
                RunError::Scratch { path: self.config.scratch_dir.clone(), cause: e.to_string() }
            })?;
        }

        info!(
            tasks = enabled.len(),
            disabled = disabled.len(),
            limit = self.config.limit.get(),
            offline = self.config.offline,
            "starting sweep"
        );

        let mut pending: VecDeque<Task> = enabled.into();
        let mut in_flight = JoinSet::new();
        let mut results = Vec::with_capacity(pending.len());
        let mut fatal: Option<RunError> = None;

        loop {
            while fatal.is_none() && in_flight.len() < self.config.limit.get() {
                let Some(task) = pending.pop_front() else {
                    break;
                };
                observer.started(&task);
                let ctx = self.ctx.clone();
                in_flight.spawn(pipeline::execute(ctx, Arc::clone(&self.config), task));
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            match joined {
                Ok(Ok(result)) => {
                    if fatal.is_none() {
                        observer.finished(&result);
                        results.push(result);
                    }
                }
                Ok(Err(err)) => {
                    error!(error = %err, "fatal error, no further tasks will start");
                    if fatal.is_none() {
                        fatal = Some(err);
                    }
                }
                Err(join_err) => {
                    error!(error = %join_err, "task did not complete");
                    if fatal.is_none() {
                        fatal = Some(RunError::Join { cause: join_err.to_string() });
                    }
                }
            }
        }

        if let Some(err) = fatal {
            return Err(err);
        }

        let report = RunReport {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: self.ctx.clock.now(),
            results,
            disabled,
        };
        info!(summary = %report.summary_line(), "sweep finished");
        Ok(report)
    }
}
