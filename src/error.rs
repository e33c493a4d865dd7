//! Errors that abort a whole sweep.
//!
//! Per-task problems (checker failures, unusable manifests) never show up
//! here; they become a [`TaskOutcome`](crate::task::TaskOutcome).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The acquisition step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionStep {
    /// Fresh shallow clone of a missing working copy.
    Clone,
    /// In-place update of an existing working copy.
    Pull,
}

impl fmt::Display for AcquisitionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clone => f.write_str("git clone"),
            Self::Pull => f.write_str("git pull"),
        }
    }
}

/// Batch-fatal errors.
#[derive(Debug, Error)]
pub enum RunError {
    /// A working copy could not be cloned or updated.
    #[error("{step} failed for {task} ({locator}): {cause}")]
    Acquisition {
        /// Name of the task whose acquisition failed.
        task: String,
        /// Clone URL of the task's repository.
        locator: String,
        /// Which step failed.
        step: AcquisitionStep,
        /// Underlying error text.
        cause: String,
    },

    /// The shared scratch directory could not be created.
    #[error("Failed to create scratch directory {}: {cause}", .path.display())]
    Scratch {
        /// The scratch directory.
        path: PathBuf,
        /// Underlying error text.
        cause: String,
    },

    /// A task's future panicked or was cancelled.
    #[error("A task did not complete: {cause}")]
    Join {
        /// Underlying error text.
        cause: String,
    },
}

impl RunError {
    /// Returns `true` for acquisition failures.
    #[must_use]
    pub fn is_acquisition(&self) -> bool {
        matches!(self, Self::Acquisition { .. })
    }
}
