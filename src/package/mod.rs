//! Package definitions: the repositories a sweep checks.
//!
//! A package list is plain configuration data. Loading lives in
//! [`source`], narrowing it down to what a run submits lives in [`select`].

pub mod select;
pub mod source;

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use select::{select, SelectionOptions, KNOWN_INCOMPATIBLE};
pub use source::{load_packages, PackageSource};

/// Whether a package is disabled, as written in the package list.
///
/// Lists mark packages either with `disable: true` or with a string giving
/// the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Disable {
    /// `disable: true` / `disable: false`.
    Flag(bool),
    /// `disable: "<reason>"`.
    Reason(String),
}

impl Default for Disable {
    fn default() -> Self {
        Self::Flag(false)
    }
}

/// One repository known to pass the style checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Unique package name; also names the package's scratch subdirectory.
    pub name: String,
    /// Repository URL without the trailing `.git`.
    pub repo: String,
    /// Extra arguments passed to the checker for this package.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Disabled marker.
    #[serde(default)]
    pub disable: Disable,
}

impl Package {
    /// Returns `true` if the package is marked disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        match &self.disable {
            Disable::Flag(flag) => *flag,
            Disable::Reason(_) => true,
        }
    }

    /// Returns the reason the package is disabled, if it is.
    #[must_use]
    pub fn disabled_reason(&self) -> Option<&str> {
        match &self.disable {
            Disable::Flag(true) => Some("disabled"),
            Disable::Flag(false) => None,
            Disable::Reason(reason) => Some(reason),
        }
    }

    /// The package's scratch subdirectory, relative to the scratch directory.
    ///
    /// Names like `@scope/pkg` nest; trailing slashes are dropped, so `a/` and
    /// `a` name the same directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or has a root, prefix, `.` or
    /// `..` component.
    pub fn workdir_name(&self) -> Result<PathBuf, String> {
        let mut dir = PathBuf::new();
        for component in Path::new(&self.name).components() {
            match component {
                Component::Normal(part) => dir.push(part),
                _ => {
                    return Err(format!(
                        "Invalid package name {:?}: not a plain relative path",
                        self.name
                    ))
                }
            }
        }
        if dir.as_os_str().is_empty() {
            return Err(format!("Invalid package name {:?}: empty", self.name));
        }
        Ok(dir)
    }

    /// The clone URL for the package's repository.
    #[must_use]
    pub fn clone_url(&self) -> String {
        if self.repo.ends_with(".git") {
            self.repo.clone()
        } else {
            format!("{}.git", self.repo)
        }
    }
}
