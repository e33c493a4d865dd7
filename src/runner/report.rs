//! The aggregate result of one sweep.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::task::{DisabledTask, TaskOutcome, TaskResult};

/// Outcome counts for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Tasks whose checker exited zero.
    pub passed: usize,
    /// Tasks whose checker failed.
    pub failed: usize,
    /// Tasks that never reached the checker.
    pub skipped: usize,
    /// Tasks listed as disabled.
    pub disabled: usize,
}

/// Every enabled task's result, in completion order, plus the disabled listing.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Unique id for this run.
    pub run_id: Uuid,
    /// When the runner started.
    pub started_at: DateTime<Utc>,
    /// When the last task resolved.
    pub finished_at: DateTime<Utc>,
    /// Task results in the order tasks finished.
    pub results: Vec<TaskResult>,
    /// Tasks that were listed but not run.
    pub disabled: Vec<DisabledTask>,
}

impl RunReport {
    /// Counts outcomes by kind.
    #[must_use]
    pub fn tally(&self) -> Tally {
        let mut tally = Tally { disabled: self.disabled.len(), ..Tally::default() };
        for result in &self.results {
            match result.outcome {
                TaskOutcome::Passed => tally.passed += 1,
                TaskOutcome::Failed { .. } => tally.failed += 1,
                TaskOutcome::Skipped { .. } => tally.skipped += 1,
            }
        }
        tally
    }

    /// Returns `true` if any task failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.results.iter().any(|r| r.outcome.is_failure())
    }

    /// Returns the failed results.
    #[must_use]
    pub fn failures(&self) -> Vec<&TaskResult> {
        self.results.iter().filter(|r| r.outcome.is_failure()).collect()
    }

    /// Looks up the result for a task by name.
    #[must_use]
    pub fn result_for(&self, name: &str) -> Option<&TaskResult> {
        self.results.iter().find(|r| r.name == name)
    }

    /// One-line summary for the end of a run.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let tally = self.tally();
        format!(
            "{} passed, {} failed, {} skipped, {} disabled",
            tally.passed, tally.failed, tally.skipped, tally.disabled
        )
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
