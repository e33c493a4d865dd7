//! Process port for running the checker and preparation commands.

use std::path::PathBuf;

use super::PortFuture;

/// A program invocation with its arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: String,
    /// Arguments passed to the program, in order.
    pub args: Vec<String>,
    /// Working directory the process starts in.
    pub cwd: PathBuf,
}

impl Invocation {
    /// Builds an invocation of `program` in `cwd`.
    #[must_use]
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), args: Vec::new(), cwd: cwd.into() }
    }

    /// Appends arguments to the invocation.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Renders the invocation as a single shell-like line for logs.
    #[must_use]
    pub fn display_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// How a finished process exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    /// The exit code, or `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ProcessExit {
    /// Returns `true` for a zero exit code.
    #[must_use]
    pub fn success(self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external programs to completion.
pub trait ProcessRunner: Send + Sync {
    /// Runs the invocation and waits for it to exit.
    ///
    /// A non-zero exit is reported through [`ProcessExit`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or awaited.
    fn run<'a>(&'a self, invocation: &'a Invocation) -> PortFuture<'a, ProcessExit>;
}
