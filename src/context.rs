//! Service context bundling all port trait objects.

use std::sync::Arc;

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::git::LiveGit;
use crate::adapters::live::process::LiveProcessRunner;
use crate::ports::{Clock, FileSystem, ProcessRunner, VersionControl};

/// Bundles all port trait objects into a single context.
///
/// Fields are reference-counted so each in-flight task can hold its own
/// handle to the shared adapters.
#[derive(Clone)]
pub struct ServiceContext {
    /// Clock for report timestamps and task durations.
    pub clock: Arc<dyn Clock>,
    /// Filesystem for working-copy probes, manifests and reports.
    pub fs: Arc<dyn FileSystem>,
    /// Version control for clone, pull and reset.
    pub vcs: Arc<dyn VersionControl>,
    /// Process runner for the checker and preparation commands.
    pub process: Arc<dyn ProcessRunner>,
}

impl ServiceContext {
    /// Creates a live context with real adapters.
    ///
    /// `quiet` discards checker and preparation output.
    #[must_use]
    pub fn live(quiet: bool) -> Self {
        Self {
            clock: Arc::new(LiveClock),
            fs: Arc::new(LiveFileSystem),
            vcs: Arc::new(LiveGit),
            process: Arc::new(LiveProcessRunner::new(quiet)),
        }
    }
}
