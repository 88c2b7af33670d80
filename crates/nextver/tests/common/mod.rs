//! Shared fixtures for the CLI integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a git command in `dir`, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("failed to spawn git");
    assert!(status.success(), "git {args:?} failed");
}

/// Create an initialized scratch repository with a test identity.
pub fn scratch_repo() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();
    git(&root, &["init", "-q"]);
    git(&root, &["config", "user.name", "Test"]);
    git(&root, &["config", "user.email", "test@example.com"]);
    git(&root, &["config", "commit.gpgsign", "false"]);
    (tmp, root)
}

/// Write `contents` to `name` (creating parent directories) and commit it.
pub fn commit_file(root: &Path, name: &str, contents: &str, message: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
    git(root, &["add", "."]);
    git(root, &["commit", "-q", "-m", message]);
}

/// Returns a Command configured to run the nextver binary against `root`.
#[allow(deprecated)]
pub fn nextver(root: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("nextver").unwrap();
    cmd.arg("--repo-root").arg(root);
    cmd
}
