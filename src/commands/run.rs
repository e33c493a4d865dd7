//! `lintsweep run` command.

use tracing::info;

use crate::cli::RunArgs;
use crate::context::ServiceContext;
use crate::runner::{ConsoleProgress, ProgressObserver, RunReport, Runner};
use crate::task::Task;

/// Execute the `run` command with live adapters.
///
/// # Errors
///
/// Returns an error string if configuration is invalid, the run aborts, or
/// any package fails the checker.
pub async fn run(args: &RunArgs) -> Result<(), String> {
    let ctx = ServiceContext::live(args.quiet);
    run_with_context(&ctx, args, &ConsoleProgress).await.map(|_| ())
}

/// Execute the `run` command against the given adapters.
///
/// The report is written (when requested) before failures are turned into
/// an error, so failed runs still leave a report behind.
///
/// # Errors
///
/// Returns an error string if configuration is invalid, the run aborts, or
/// any package fails the checker.
pub async fn run_with_context(
    ctx: &ServiceContext,
    args: &RunArgs,
    observer: &dyn ProgressObserver,
) -> Result<RunReport, String> {
    let mut config = super::load_config(ctx, &args.select)?;
    if let Some(limit) = args.concurrency {
        config.concurrency = Some(usize::from(limit));
    }
    if let Some(dir) = &args.scratch_dir {
        config.scratch_dir.clone_from(dir);
    }
    config.validate()?;

    let packages = super::select_packages(ctx, &config, &args.select).await?;
    let tasks = packages
        .iter()
        .map(|pkg| Task::from_package(pkg, &config.scratch_dir))
        .collect::<Result<Vec<Task>, String>>()?;

    let runner = Runner::new(ctx.clone(), config.runner_config(args.offline));
    let report = runner.run(tasks, observer).await.map_err(|e| format!("Aborted: {e}"))?;

    println!("{}", report.summary_line());
    if let Some(path) = &args.report {
        let json = report.to_json().map_err(|e| format!("Failed to serialize report: {e}"))?;
        ctx.fs
            .write(path, &json)
            .map_err(|e| format!("Failed to write report {}: {e}", path.display()))?;
        info!(path = %path.display(), "wrote run report");
    }

    let failures = report.failures();
    if !failures.is_empty() {
        let names: Vec<&str> = failures.iter().map(|r| r.name.as_str()).collect();
        return Err(format!("{} package(s) failed: {}", names.len(), names.join(", ")));
    }
    Ok(report)
}
