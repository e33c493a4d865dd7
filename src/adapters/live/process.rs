//! Live process runner using `tokio::process`.

use std::process::Stdio;

use tokio::process::Command;

use crate::ports::process::{Invocation, ProcessExit, ProcessRunner};
use crate::ports::{PortError, PortFuture};

/// Live process runner.
///
/// In quiet mode the child's stdout and stderr are discarded; otherwise
/// they are inherited so checker output streams to the terminal.
pub struct LiveProcessRunner {
    quiet: bool,
}

impl LiveProcessRunner {
    /// Creates a runner that inherits or discards child output.
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn output_stdio(&self) -> Stdio {
        if self.quiet {
            Stdio::null()
        } else {
            Stdio::inherit()
        }
    }
}

impl ProcessRunner for LiveProcessRunner {
    fn run<'a>(&'a self, invocation: &'a Invocation) -> PortFuture<'a, ProcessExit> {
        Box::pin(async move {
            let status = Command::new(&invocation.program)
                .args(&invocation.args)
                .current_dir(&invocation.cwd)
                .stdin(Stdio::null())
                .stdout(self.output_stdio())
                .stderr(self.output_stdio())
                .status()
                .await
                .map_err(|e| -> PortError {
                    format!("failed to spawn {}: {e}", invocation.program).into()
                })?;
            Ok(ProcessExit { code: status.code() })
        })
    }
}
