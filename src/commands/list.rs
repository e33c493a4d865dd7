//! `lintsweep list` command.

use crate::cli::SelectArgs;
use crate::context::ServiceContext;
use crate::package::Package;

/// Execute the `list` command.
///
/// # Errors
///
/// Returns an error string if the config or package list cannot be loaded.
pub async fn run(args: &SelectArgs) -> Result<(), String> {
    let ctx = ServiceContext::live(true);
    let packages = list_with_context(&ctx, args).await?;
    for line in render(&packages) {
        println!("{line}");
    }
    Ok(())
}

/// Returns the packages a run with the same selection would see.
///
/// # Errors
///
/// Returns an error string if the config or package list cannot be loaded.
pub async fn list_with_context(
    ctx: &ServiceContext,
    args: &SelectArgs,
) -> Result<Vec<Package>, String> {
    let config = super::load_config(ctx, args)?;
    config.validate()?;
    super::select_packages(ctx, &config, args).await
}

fn render(packages: &[Package]) -> Vec<String> {
    let mut lines: Vec<String> = packages
        .iter()
        .map(|pkg| match pkg.disabled_reason() {
            Some(reason) => format!("DISABLED: {}: {reason} ({})", pkg.name, pkg.repo),
            None => format!("{} ({})", pkg.name, pkg.repo),
        })
        .collect();
    let enabled = packages.iter().filter(|pkg| !pkg.is_disabled()).count();
    lines.push(format!("{enabled} enabled, {} disabled", packages.len() - enabled));
    lines
}
