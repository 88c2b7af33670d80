//! Shared helpers for unit tests that need a scratch git repository.

use camino::{Utf8Path, Utf8PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Run a git command in `dir`, panicking on failure.
pub fn git(dir: &Utf8Path, args: &[&str]) {
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
pub fn scratch_repo() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
    git(&root, &["init", "-q"]);
    git(&root, &["config", "user.name", "Test"]);
    git(&root, &["config", "user.email", "test@example.com"]);
    git(&root, &["config", "commit.gpgsign", "false"]);
    (tmp, root)
}

/// Write `contents` to `name` (creating parent directories) and commit it.
pub fn commit_file(root: &Utf8Path, name: &str, contents: &str, message: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
    git(root, &["add", "."]);
    git(root, &["commit", "-q", "-m", message]);
}
