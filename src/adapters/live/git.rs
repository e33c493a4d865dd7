//! Live version-control adapter using the `git` CLI.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use crate::ports::git::VersionControl;
use crate::ports::{PortError, PortFuture};

const GIT: &str = "git";

/// Live adapter that shells out to `git`.
pub struct LiveGit;

impl LiveGit {
    async fn git(args: &[&OsStr], cwd: Option<&Path>, label: &str) -> Result<(), PortError> {
        let mut command = Command::new(GIT);
        command.args(args).stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::piped());
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| -> PortError {
            format!("failed to spawn {label}: {e}").into()
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(match output.status.code() {
                Some(code) if stderr.is_empty() => format!("{label}: non-zero exit code: {code}"),
                Some(code) => format!("{label}: non-zero exit code: {code}: {stderr}"),
                None => format!("{label}: terminated by signal"),
            }
            .into());
        }
        Ok(())
    }
}

impl VersionControl for LiveGit {
    fn clone_shallow<'a>(&'a self, url: &'a str, dest: &'a Path) -> PortFuture<'a, ()> {
        Box::pin(async move {
            let args = [
                OsStr::new("clone"),
                OsStr::new("--depth"),
                OsStr::new("1"),
                OsStr::new(url),
                dest.as_os_str(),
            ];
            Self::git(&args, None, "git clone").await
        })
    }

    fn pull<'a>(&'a self, dir: &'a Path) -> PortFuture<'a, ()> {
        Box::pin(async move { Self::git(&[OsStr::new("pull")], Some(dir), "git pull").await })
    }

    fn reset_hard<'a>(&'a self, dir: &'a Path) -> PortFuture<'a, ()> {
        Box::pin(async move {
            Self::git(&[OsStr::new("reset"), OsStr::new("--hard")], Some(dir), "git reset").await
        })
    }
}
