//! Command dispatch and handlers.

pub mod list;
pub mod run;

use crate::cli::{Command, SelectArgs};
use crate::config::SweepConfig;
use crate::context::ServiceContext;
use crate::package::{self, load_packages, Package};

/// Dispatch a parsed command to its handler.
///
/// Handlers run on a single-threaded runtime; repositories are processed
/// concurrently by awaiting their child processes.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;

    match command {
        Command::Run(args) => runtime.block_on(run::run(args)),
        Command::List(args) => runtime.block_on(list::run(args)),
    }
}

/// Loads the layered config: file, then environment, then `--packages`.
fn load_config(ctx: &ServiceContext, select: &SelectArgs) -> Result<SweepConfig, String> {
    let mut config = SweepConfig::load(ctx.fs.as_ref(), select.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok())?;
    if let Some(packages) = &select.packages {
        config.packages.clone_from(packages);
    }
    Ok(config)
}

/// Loads the package list and applies quick, exclusion and disabled-only
/// selection.
async fn select_packages(
    ctx: &ServiceContext,
    config: &SweepConfig,
    select: &SelectArgs,
) -> Result<Vec<Package>, String> {
    let source = config.package_source()?;
    let packages = load_packages(ctx.fs.as_ref(), &source).await?;
    Ok(package::select(packages, &config.selection(select.quick, select.disabled)))
}
