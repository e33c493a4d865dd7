//! End-to-end sweeps against throwaway local git repositories.
//!
//! Each test builds origin repositories in a temp directory and points the
//! package list at them through `file://` URLs. Tests return early when no
//! `git` binary is available.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use lintsweep::cli::{RunArgs, SelectArgs};
use lintsweep::commands::run::run_with_context;
use lintsweep::context::ServiceContext;
use lintsweep::runner::ProgressObserver;
use lintsweep::task::{DisabledTask, TaskOutcome, TaskResult};

#[derive(Default)]
struct Collect {
    finished: Mutex<Vec<TaskResult>>,
}

impl ProgressObserver for Collect {
    fn disabled(&self, _tasks: &[DisabledTask]) {}

    fn finished(&self, result: &TaskResult) {
        self.finished.lock().unwrap().push(result.clone());
    }
}

fn git(cwd: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=sweep", "-c", "user.email=sweep@example.com"])
        .args(args)
        .current_dir(cwd)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok_and(|o| o.status.success())
}

/// Creates `<root>/<name>.git` holding one commit with the given files and
/// returns the repo URL without the `.git` suffix.
fn origin(root: &Path, name: &str, files: &[(&str, &str)]) -> String {
    let work = root.join(format!("{name}-work"));
    std::fs::create_dir_all(&work).unwrap();
    git(&work, &["init", "--quiet"]);
    for (file, contents) in files {
        std::fs::write(work.join(file), contents).unwrap();
    }
    git(&work, &["add", "."]);
    git(&work, &["commit", "--quiet", "-m", "init"]);
    let bare = root.join(format!("{name}.git"));
    git(root, &["clone", "--quiet", "--bare", work.to_str().unwrap(), bare.to_str().unwrap()]);
    format!("file://{}", root.join(name).display())
}

struct Sweep {
    _root: tempfile::TempDir,
    config: PathBuf,
    scratch: PathBuf,
}

fn sweep(packages: &str, extra_config: &str) -> Sweep {
    let root = tempfile::tempdir().unwrap();
    let list = root.path().join("packages.json");
    std::fs::write(&list, packages).unwrap();
    let scratch = root.path().join("scratch");
    let config = root.path().join("lintsweep.yaml");
    std::fs::write(
        &config,
        format!(
            "packages: {}\nscratch_dir: {}\nconcurrency: 2\n\
             linter:\n  program: sh\n  args: [-c, 'test ! -f broken']\n{extra_config}",
            list.display(),
            scratch.display()
        ),
    )
    .unwrap();
    Sweep { _root: root, config, scratch }
}

fn args(sweep: &Sweep) -> RunArgs {
    RunArgs {
        select: SelectArgs { config: Some(sweep.config.clone()), ..SelectArgs::default() },
        quiet: true,
        ..RunArgs::default()
    }
}

#[tokio::test]
async fn clones_checks_and_restores_working_copies() {
    if !git_available() {
        return;
    }
    let repos = tempfile::tempdir().unwrap();
    let package_json = r#"{"devDependencies": {"standard": "*"}}"#;
    let clean =
        origin(repos.path(), "clean", &[("package.json", package_json), ("index.js", "a\n")]);
    let broken = origin(repos.path(), "broken", &[("package.json", package_json), ("broken", "")]);
    let packages = format!(
        r#"[{{"name": "clean", "repo": "{clean}"}}, {{"name": "broken", "repo": "{broken}"}}]"#
    );
    let sweep = sweep(
        &packages,
        "prepare:\n  program: sh\n  args: [-c, 'echo mutated >> index.js']\nexclude: []\n",
    );
    let observer = Collect::default();

    let err = run_with_context(&ServiceContext::live(true), &args(&sweep), &observer)
        .await
        .unwrap_err();

    assert_eq!(err, "1 package(s) failed: broken");
    let finished = observer.finished.lock().unwrap();
    let outcome = |name: &str| finished.iter().find(|r| r.name == name).unwrap().outcome.clone();
    assert_eq!(outcome("clean"), TaskOutcome::Passed);
    assert!(matches!(outcome("broken"), TaskOutcome::Failed { exit_code: Some(1), .. }));
    assert_eq!(std::fs::read_to_string(sweep.scratch.join("clean/index.js")).unwrap(), "a\n");
}

#[tokio::test]
async fn second_run_pulls_existing_copies() {
    if !git_available() {
        return;
    }
    let repos = tempfile::tempdir().unwrap();
    let manifest = r#"{"dependencies": {"standard": "1"}}"#;
    let repo = origin(repos.path(), "pkg", &[("package.json", manifest)]);
    let sweep = sweep(&format!(r#"[{{"name": "pkg", "repo": "{repo}"}}]"#), "prepare: null\n");

    let first = run_with_context(&ServiceContext::live(true), &args(&sweep), &Collect::default())
        .await
        .unwrap();
    assert_eq!(first.result_for("pkg").unwrap().outcome, TaskOutcome::Passed);
    assert!(!sweep.scratch.join("pkg/CHANGELOG").exists());

    let work = repos.path().join("pkg-work");
    std::fs::write(work.join("CHANGELOG"), "1.0.1\n").unwrap();
    git(&work, &["add", "CHANGELOG"]);
    git(&work, &["commit", "--quiet", "-m", "changelog"]);
    let bare = repos.path().join("pkg.git");
    git(&work, &["push", "--quiet", bare.to_str().unwrap(), "HEAD"]);

    let second = run_with_context(&ServiceContext::live(true), &args(&sweep), &Collect::default())
        .await
        .unwrap();

    assert_eq!(second.result_for("pkg").unwrap().outcome, TaskOutcome::Passed);
    assert_eq!(
        std::fs::read_to_string(sweep.scratch.join("pkg/CHANGELOG")).unwrap(),
        "1.0.1\n"
    );
}

#[tokio::test]
async fn package_without_checker_dependency_is_skipped() {
    if !git_available() {
        return;
    }
    let repos = tempfile::tempdir().unwrap();
    let manifest = r#"{"dependencies": {"left-pad": "1"}, "devDependencies": {"tape": "5"}}"#;
    let repo = origin(repos.path(), "other", &[("package.json", manifest), ("broken", "")]);
    let sweep =
        sweep(&format!(r#"[{{"name": "other", "repo": "{repo}"}}]"#), "prepare: null\n");

    let report = run_with_context(&ServiceContext::live(true), &args(&sweep), &Collect::default())
        .await
        .unwrap();

    assert_eq!(
        report.result_for("other").unwrap().outcome,
        TaskOutcome::Skipped { reason: "does not use standard".into() }
    );
}

#[tokio::test]
async fn unreachable_repository_aborts_the_run() {
    if !git_available() {
        return;
    }
    let repos = tempfile::tempdir().unwrap();
    let missing = format!("file://{}", repos.path().join("missing").display());
    let sweep = sweep(&format!(r#"[{{"name": "missing", "repo": "{missing}"}}]"#), "");

    let err = run_with_context(&ServiceContext::live(true), &args(&sweep), &Collect::default())
        .await
        .unwrap_err();

    assert!(err.starts_with("Aborted: git clone failed for missing"), "{err}");
}
