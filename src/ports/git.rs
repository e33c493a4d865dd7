//! Version-control port for acquiring and restoring working copies.

use std::path::Path;

use super::PortFuture;

/// Fetches, updates and restores repository working copies.
///
/// Every method suspends while the underlying process runs, so many
/// working copies can be acquired concurrently on one runtime.
pub trait VersionControl: Send + Sync {
    /// Creates a shallow (depth 1) clone of `url` at `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits non-zero.
    fn clone_shallow<'a>(&'a self, url: &'a str, dest: &'a Path) -> PortFuture<'a, ()>;

    /// Pulls the latest changes into the existing working copy at `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits non-zero.
    fn pull<'a>(&'a self, dir: &'a Path) -> PortFuture<'a, ()>;

    /// Discards every local modification in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits non-zero.
    fn reset_hard<'a>(&'a self, dir: &'a Path) -> PortFuture<'a, ()>;
}
