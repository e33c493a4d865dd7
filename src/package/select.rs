//! Narrowing a package list down to what one run submits.

use super::{Disable, Package};

/// Reason recorded on packages disabled through the exclusion set.
pub const EXCLUDED_REASON: &str = "known incompatible";

/// Packages whose repositories pass `standard` but not the checker under
/// test. Used as the default exclusion set.
pub const KNOWN_INCOMPATIBLE: &[&str] = &[
    "auto-changelog",
    "babel-plugin-istanbul",
    "bitmidi.com",
    "co-mocha",
    "create-torrent",
    "dotenv",
    "electron-mocha",
    "fastify",
    "front-matter",
    "fs-extra",
    "fs-writefile-promise",
    "humanize-duration",
    "instant.io",
    "jsonfile",
    "karma-cli",
    "pino",
    "tap",
    "testdouble",
    "webtorrent-desktop",
];

/// How to pick packages for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOptions {
    /// Keep only the first `quick_count` packages.
    pub quick: bool,
    /// Package count kept in quick mode.
    pub quick_count: usize,
    /// Submit the disabled packages, and only those, as enabled tasks.
    pub disabled_only: bool,
    /// Package names to mark disabled before the run.
    pub exclude: Vec<String>,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            quick: false,
            quick_count: 20,
            disabled_only: false,
            exclude: KNOWN_INCOMPATIBLE.iter().map(|name| (*name).to_string()).collect(),
        }
    }
}

/// Applies quick mode, the exclusion set and disabled-only mode.
///
/// The result keeps list order. Outside disabled-only mode, disabled
/// packages stay in the result so the run can list them.
#[must_use]
pub fn select(packages: Vec<Package>, options: &SelectionOptions) -> Vec<Package> {
    let limit = if options.quick { options.quick_count } else { usize::MAX };

    let marked = packages.into_iter().take(limit).map(|mut pkg| {
        if !pkg.is_disabled() && options.exclude.iter().any(|name| *name == pkg.name) {
            pkg.disable = Disable::Reason(EXCLUDED_REASON.to_string());
        }
        pkg
    });

    if options.disabled_only {
        marked
            .filter(Package::is_disabled)
            .map(|mut pkg| {
                pkg.disable = Disable::Flag(false);
                pkg
            })
            .collect()
    } else {
        marked.collect()
    }
}
