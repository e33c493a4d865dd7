//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the sweep core and an external
//! system (time, filesystem, version control, processes). Implementations
//! live in `src/adapters/`.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

pub mod clock;
pub mod filesystem;
pub mod git;
pub mod process;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use git::VersionControl;
pub use process::{Invocation, ProcessExit, ProcessRunner};

/// Error type returned by port implementations.
pub type PortError = Box<dyn Error + Send + Sync>;

/// Boxed future type alias used by async ports to keep them dyn-compatible.
pub type PortFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, PortError>> + Send + 'a>>;
