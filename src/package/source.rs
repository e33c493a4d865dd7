//! Loading package lists from files or URLs.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use super::Package;
use crate::ports::FileSystem;

/// Where a package list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSource {
    /// A local `.json`, `.yaml` or `.yml` file.
    File(PathBuf),
    /// An `http://` or `https://` URL serving a JSON array.
    Url(String),
}

impl FromStr for PackageSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("package source must not be empty".to_string());
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Url(s.to_string()))
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for PackageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Loads and validates a package list.
///
/// # Errors
///
/// Returns an error if the list cannot be read or fetched, does not parse,
/// or names the same package twice.
pub async fn load_packages(
    fs: &dyn FileSystem,
    source: &PackageSource,
) -> Result<Vec<Package>, String> {
    let packages = match source {
        PackageSource::File(path) => {
            let contents = fs
                .read_to_string(path)
                .map_err(|e| format!("Failed to read package list {}: {e}", path.display()))?;
            parse_packages(path, &contents)?
        }
        PackageSource::Url(url) => fetch_packages(url).await?,
    };
    debug!(source = %source, count = packages.len(), "loaded package list");
    check_unique(&packages)?;
    Ok(packages)
}

/// Parses a package list, choosing YAML or JSON by file extension.
///
/// # Errors
///
/// Returns an error if the contents do not parse as a list of packages.
pub fn parse_packages(path: &Path, contents: &str) -> Result<Vec<Package>, String> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    if is_yaml {
        serde_yaml::from_str(contents)
            .map_err(|e| format!("Failed to parse package list {}: {e}", path.display()))
    } else {
        serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse package list {}: {e}", path.display()))
    }
}

async fn fetch_packages(url: &str) -> Result<Vec<Package>, String> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| format!("Failed to fetch package list {url}: {e}"))?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("Failed to fetch package list {url}: HTTP {}", status.as_u16()));
    }
    response
        .json::<Vec<Package>>()
        .await
        .map_err(|e| format!("Failed to parse package list {url}: {e}"))
}

/// Every package needs a scratch subdirectory of its own.
fn check_unique(packages: &[Package]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(packages.len());
    for pkg in packages {
        if !seen.insert(pkg.workdir_name()?) {
            return Err(format!("Duplicate package name in list: {}", pkg.name));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::live::filesystem::LiveFileSystem;

    #[test]
    fn source_parses_urls_and_paths() {
        assert_eq!(
            "https://example.com/test.json".parse::<PackageSource>().unwrap(),
            PackageSource::Url("https://example.com/test.json".into())
        );
        assert_eq!(
            "packages.yaml".parse::<PackageSource>().unwrap(),
            PackageSource::File(PathBuf::from("packages.yaml"))
        );
        assert!("  ".parse::<PackageSource>().is_err());
    }

    #[test]
    fn yaml_lists_parse_by_extension() {
        let yaml =
            "- name: standard\n  repo: https://github.com/standard/standard\n  args: [src/]\n";
        let pkgs = parse_packages(Path::new("list.yml"), yaml).unwrap();

        assert_eq!(pkgs.len(), 1);
        assert_eq!(pkgs[0].args, vec!["src/".to_string()]);
    }

    #[test]
    fn json_is_the_default_format() {
        let err = parse_packages(Path::new("list"), "- name: x").unwrap_err();
        assert!(err.contains("Failed to parse package list"));
    }

    #[tokio::test]
    async fn duplicate_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.json");
        std::fs::write(
            &path,
            r#"[{"name": "a", "repo": "https://example.com/a"},
                {"name": "a", "repo": "https://example.com/b"}]"#,
        )
        .unwrap();

        let err = load_packages(&LiveFileSystem, &PackageSource::File(path)).await.unwrap_err();
        assert!(err.contains("Duplicate package name"));
    }

    #[tokio::test]
    async fn names_sharing_a_working_copy_are_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.json");
        std::fs::write(
            &path,
            r#"[{"name": "a", "repo": "https://example.com/a"},
                {"name": "a/", "repo": "https://example.com/b"}]"#,
        )
        .unwrap();

        let err = load_packages(&LiveFileSystem, &PackageSource::File(path)).await.unwrap_err();
        assert!(err.contains("Duplicate package name in list: a/"));
    }

    #[tokio::test]
    async fn names_escaping_the_scratch_dir_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.json");
        std::fs::write(&path, r#"[{"name": "..", "repo": "https://example.com/up"}]"#).unwrap();

        let err = load_packages(&LiveFileSystem, &PackageSource::File(path)).await.unwrap_err();
        assert!(err.contains("Invalid package name \"..\""));
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let err = load_packages(&LiveFileSystem, &PackageSource::File("nope.json".into()))
            .await
            .unwrap_err();
        assert!(err.contains("nope.json"));
    }
}
