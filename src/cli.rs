//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI parser for `lintsweep`.
#[derive(Debug, Parser)]
#[command(
    name = "lintsweep",
    version,
    about = "Run a style checker against known-clean repositories"
)]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Acquire every selected repository and run the checker against it.
    Run(RunArgs),
    /// Print the selected packages without running anything.
    List(SelectArgs),
}

/// Options shared by every command that reads the package list.
#[derive(Debug, Clone, Default, Args)]
pub struct SelectArgs {
    /// Config file (defaults to `lintsweep.yaml` when present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Package list file or URL.
    #[arg(long, value_name = "SRC")]
    pub packages: Option<String>,
    /// Only use the first packages of the list.
    #[arg(long)]
    pub quick: bool,
    /// Select only the disabled packages.
    #[arg(long)]
    pub disabled: bool,
}

/// Options for `lintsweep run`.
#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Package selection.
    #[command(flatten)]
    pub select: SelectArgs,
    /// Never touch the network; packages without a local copy are skipped.
    #[arg(long)]
    pub offline: bool,
    /// Discard checker output.
    #[arg(long)]
    pub quiet: bool,
    /// Maximum number of repositories processed at once.
    #[arg(
        long,
        short = 'j',
        value_name = "N",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub concurrency: Option<u16>,
    /// Parent directory for working copies.
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,
    /// Write the JSON run report to this file.
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}
