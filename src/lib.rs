//! Core library entry for the `lintsweep` CLI.
//!
//! `lintsweep` clones (or updates) repositories known to pass a style
//! checker and runs the checker against each with bounded parallelism, so
//! rule changes that break previously clean code are caught early.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod package;
pub mod ports;
pub mod runner;
pub mod task;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version are not failures.
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_lists_packages_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("packages.json");
        std::fs::write(&list, r#"[{"name": "a", "repo": "https://example.com/a"}]"#).unwrap();

        let result = run(["lintsweep", "list", "--packages", list.to_str().unwrap()]);
        assert!(result.is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["lintsweep", "unknown"]);
        assert!(result.is_err());
    }
}
