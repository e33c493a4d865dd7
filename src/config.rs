//! Sweep configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `LINTSWEEP_*` environment variables, then command-line flags (applied by
//! the command handlers).

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::package::{PackageSource, SelectionOptions, KNOWN_INCOMPATIBLE};
use crate::ports::FileSystem;
use crate::runner::{CommandSpec, ManifestCheck, RunnerConfig};

/// Config file looked up in the current directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "lintsweep.yaml";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "LINTSWEEP_";

/// Everything a sweep can be configured with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Package list file or URL.
    pub packages: String,
    /// Parent directory of every working copy.
    pub scratch_dir: PathBuf,
    /// Maximum tasks in flight; defaults to the available parallelism.
    pub concurrency: Option<usize>,
    /// The style checker.
    pub linter: CommandSpec,
    /// Best-effort command run before the checker; `null` skips preparation.
    pub prepare: Option<CommandSpec>,
    /// Manifest inspected before the checker; `null` disables the check.
    pub manifest: Option<ManifestCheck>,
    /// Package names marked disabled before the run.
    pub exclude: Vec<String>,
    /// Package count kept in quick mode.
    pub quick_count: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            packages: "packages.json".to_string(),
            scratch_dir: PathBuf::from("tmp"),
            concurrency: None,
            linter: CommandSpec {
                program: "standardx".to_string(),
                args: vec!["--verbose".to_string()],
            },
            prepare: Some(CommandSpec {
                program: "standard-eject".to_string(),
                args: vec!["--no-install".to_string()],
            }),
            manifest: Some(ManifestCheck::default()),
            exclude: KNOWN_INCOMPATIBLE.iter().map(|name| (*name).to_string()).collect(),
            quick_count: 20,
        }
    }
}

impl SweepConfig {
    /// Loads the config file, falling back to defaults.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`]
    /// is read if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(fs: &dyn FileSystem, path: Option<&Path>) -> Result<Self, String> {
        let path = match path {
            Some(path) => path,
            None if fs.is_accessible(Path::new(DEFAULT_CONFIG_FILE)) => {
                Path::new(DEFAULT_CONFIG_FILE)
            }
            None => return Ok(Self::default()),
        };
        let contents = fs
            .read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
        let config: Self = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file {}: {e}", path.display()))?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Applies `LINTSWEEP_*` overrides read through `var`.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| var(&format!("{ENV_PREFIX}{key}")).filter(|v| !v.is_empty());

        if let Some(packages) = get("PACKAGES") {
            self.packages = packages;
        }
        if let Some(dir) = get("SCRATCH_DIR") {
            self.scratch_dir = PathBuf::from(dir);
        }
        if let Some(program) = get("LINTER") {
            self.linter.program = program;
        }
        if let Some(value) = get("CONCURRENCY") {
            let limit = value
                .parse()
                .map_err(|e| format!("Invalid {ENV_PREFIX}CONCURRENCY {value:?}: {e}"))?;
            self.concurrency = Some(limit);
        }
        Ok(())
    }

    /// Checks values that cannot be expressed in the types.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.concurrency == Some(0) {
            return Err("concurrency must be at least 1".to_string());
        }
        if self.linter.program.trim().is_empty() {
            return Err("linter.program must not be empty".to_string());
        }
        if self.prepare.as_ref().is_some_and(|p| p.program.trim().is_empty()) {
            return Err("prepare.program must not be empty".to_string());
        }
        self.package_source().map(|_| ())
    }

    /// The parsed package list source.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured source is empty.
    pub fn package_source(&self) -> Result<PackageSource, String> {
        self.packages.parse()
    }

    /// The effective concurrency limit.
    #[must_use]
    pub fn limit(&self) -> NonZeroUsize {
        self.concurrency
            .and_then(NonZeroUsize::new)
            .or_else(|| std::thread::available_parallelism().ok())
            .unwrap_or(NonZeroUsize::MIN)
    }

    /// Selection options for this config.
    #[must_use]
    pub fn selection(&self, quick: bool, disabled_only: bool) -> SelectionOptions {
        SelectionOptions {
            quick,
            quick_count: self.quick_count,
            disabled_only,
            exclude: self.exclude.clone(),
        }
    }

    /// Runner settings for this config.
    #[must_use]
    pub fn runner_config(&self, offline: bool) -> RunnerConfig {
        RunnerConfig {
            limit: self.limit(),
            offline,
            scratch_dir: self.scratch_dir.clone(),
            checker: self.linter.clone(),
            prepare: self.prepare.clone(),
            manifest: self.manifest.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_standard_checker() {
        let config = SweepConfig::default();
        assert_eq!(config.linter.program, "standardx");
        assert_eq!(config.linter.args, vec!["--verbose"]);
        assert_eq!(config.manifest, Some(ManifestCheck::default()));
        let prepare = config.prepare.as_ref().unwrap();
        assert_eq!(prepare.program, "standard-eject");
        assert_eq!(prepare.args, vec!["--no-install"]);
        assert!(config.exclude.iter().any(|name| name == "pino"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.yaml");
        std::fs::write(
            &path,
            "packages: https://example.com/test.json\n\
             concurrency: 3\n\
             prepare: null\n\
             manifest: null\n\
             exclude: []\n",
        )
        .unwrap();

        let config = SweepConfig::load(&LiveFileSystem, Some(&path)).unwrap();

        assert_eq!(config.limit().get(), 3);
        assert!(config.prepare.is_none());
        assert!(config.manifest.is_none());
        assert!(config.exclude.is_empty());
        assert_eq!(config.linter.program, "standardx");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.yaml");
        std::fs::write(&path, "paralel: 4\n").unwrap();

        let err = SweepConfig::load(&LiveFileSystem, Some(&path)).unwrap_err();
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = SweepConfig::load(&LiveFileSystem, Some(Path::new("/nonexistent/sweep.yaml")))
            .unwrap_err();
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = SweepConfig::default();
        config
            .apply_env(env(&[
                ("LINTSWEEP_PACKAGES", "list.yaml"),
                ("LINTSWEEP_SCRATCH_DIR", "/var/sweep"),
                ("LINTSWEEP_CONCURRENCY", "2"),
                ("LINTSWEEP_LINTER", "standard"),
            ]))
            .unwrap();

        assert_eq!(config.package_source().unwrap(), PackageSource::File("list.yaml".into()));
        assert_eq!(config.scratch_dir, PathBuf::from("/var/sweep"));
        assert_eq!(config.limit().get(), 2);
        assert_eq!(config.linter.program, "standard");
    }

    #[test]
    fn bad_concurrency_env_is_an_error() {
        let mut config = SweepConfig::default();
        let err = config.apply_env(env(&[("LINTSWEEP_CONCURRENCY", "many")])).unwrap_err();
        assert!(err.contains("LINTSWEEP_CONCURRENCY"));
    }

    #[test]
    fn zero_concurrency_fails_validation() {
        let config = SweepConfig { concurrency: Some(0), ..SweepConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn runner_config_carries_settings() {
        let config = SweepConfig { concurrency: Some(5), ..SweepConfig::default() };
        let runner = config.runner_config(true);

        assert!(runner.offline);
        assert_eq!(runner.limit.get(), 5);
        assert_eq!(runner.scratch_dir, PathBuf::from("tmp"));
        assert_eq!(runner.checker, config.linter);
    }
}
