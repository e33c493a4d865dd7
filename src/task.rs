//! Tasks and their outcomes.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::package::Package;

/// One "acquire, verify, clean up" unit of work for a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Task name; unique within a run.
    pub name: String,
    /// Clone URL of the repository.
    pub source: String,
    /// Working copy owned by this task for the duration of the run.
    pub workdir: PathBuf,
    /// Extra checker arguments.
    pub args: Vec<String>,
    /// Reason the task is disabled, if it is.
    pub disabled: Option<String>,
}

impl Task {
    /// Builds the task for `package` with its working copy under `scratch_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the package name does not name a subdirectory of
    /// `scratch_dir`.
    pub fn from_package(package: &Package, scratch_dir: &Path) -> Result<Self, String> {
        Ok(Self {
            name: package.name.clone(),
            source: package.clone_url(),
            workdir: scratch_dir.join(package.workdir_name()?),
            args: package.args.clone(),
            disabled: package.disabled_reason().map(str::to_string),
        })
    }

    /// Returns `true` if the task must not run.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled.is_some()
    }
}

/// How a task resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The checker exited with status zero.
    Passed,
    /// The checker exited non-zero, was killed, or could not be started.
    Failed {
        /// Exit code, if the checker exited normally.
        exit_code: Option<i32>,
        /// Human-readable cause.
        reason: String,
    },
    /// The checker was not run.
    Skipped {
        /// Why the task was skipped.
        reason: String,
    },
}

impl TaskOutcome {
    /// Returns `true` for [`TaskOutcome::Failed`].
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// The recorded result of one enabled task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskResult {
    /// Task name.
    pub name: String,
    /// Clone URL of the repository.
    pub source: String,
    /// Outcome of the task.
    #[serde(flatten)]
    pub outcome: TaskOutcome,
    /// Wall-clock time the task held its slot, in milliseconds.
    pub duration_ms: u64,
}

/// A task that was listed but never run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisabledTask {
    /// Task name.
    pub name: String,
    /// Clone URL of the repository.
    pub source: String,
    /// Why the task is disabled.
    pub reason: String,
}
