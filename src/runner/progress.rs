//! Progress notifications streamed while a sweep runs.

use crate::task::{DisabledTask, Task, TaskOutcome, TaskResult};

/// Receives progress notifications from the runner.
///
/// Notifications are delivered from the runner's own loop, one at a time,
/// in completion order.
pub trait ProgressObserver: Send + Sync {
    /// Called once per run with every disabled task, before any task starts.
    fn disabled(&self, tasks: &[DisabledTask]);

    /// Called when a task is admitted into the pool.
    fn started(&self, _task: &Task) {}

    /// Called once per enabled task as it finishes.
    fn finished(&self, result: &TaskResult);
}

/// Prints one line per notification to stdout.
pub struct ConsoleProgress;

impl ConsoleProgress {
    /// Formats the line printed for a finished task.
    #[must_use]
    pub fn result_line(result: &TaskResult) -> String {
        let label = format!("{} ({})", result.name, result.source);
        match &result.outcome {
            TaskOutcome::Passed => format!("PASS {label}"),
            TaskOutcome::Failed { reason, .. } => format!("FAIL {label}: {reason}"),
            TaskOutcome::Skipped { reason } => format!("SKIP {label}: {reason}"),
        }
    }
}

impl ProgressObserver for ConsoleProgress {
    fn disabled(&self, tasks: &[DisabledTask]) {
        for task in tasks {
            println!("DISABLED: {}: {} ({})", task.name, task.reason, task.source);
        }
    }

    fn finished(&self, result: &TaskResult) {
        println!("{}", Self::result_line(result));
    }
}
