//! Optional git mutations after the analysis: commit, tag, push.
//!
//! These run only when explicitly requested and are the one place the tool
//! writes to the repository. Unlike the always-soft analysis phase,
//! failures here are hard and each maps to a distinct process exit code.
//! Prerelease versions are never committed or tagged.

use camino::Utf8Path;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::git::run_git;
use crate::version::is_prerelease;

/// Requested mutations and their knobs.
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Create a release commit with the `VERSION` update.
    pub commit: bool,
    /// Create a git tag for the new version.
    pub tag: bool,
    /// Push the current branch.
    pub push: bool,
    /// Push all tags.
    pub push_tags: bool,
    /// Allow committing from a dirty working tree.
    pub allow_dirty: bool,
    /// GPG-sign the commit.
    pub sign_commit: bool,
    /// Create an annotated tag (default) instead of a lightweight one.
    pub annotated_tag: bool,
    /// Create a signed tag.
    pub signed_tag: bool,
    /// Skip git hooks on commit.
    pub no_verify: bool,
    /// Remote name for pushes.
    pub remote: String,
    /// Prefix for the tag name.
    pub tag_prefix: String,
    /// Extra commit message paragraph.
    pub message: Option<String>,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            commit: false,
            tag: false,
            push: false,
            push_tags: false,
            allow_dirty: false,
            sign_commit: false,
            annotated_tag: true,
            signed_tag: false,
            no_verify: false,
            remote: "origin".to_string(),
            tag_prefix: "v".to_string(),
            message: None,
        }
    }
}

impl ReleaseOptions {
    /// Whether any mutation was requested at all.
    pub const fn requested(&self) -> bool {
        self.commit || self.tag || self.push || self.push_tags
    }
}

/// Hard failures from the mutation phase. Each carries a distinct exit code.
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// HEAD is detached; mutations need a branch.
    #[error("detached HEAD; checkout a branch before continuing")]
    DetachedHead,

    /// The working tree has changes and `allow_dirty` was not set.
    #[error("working tree has changes; use --allow-dirty to override")]
    DirtyTree,

    /// `git commit` failed.
    #[error("git commit failed")]
    CommitFailed,

    /// Tagging a prerelease version was requested.
    #[error("pre-release versions should not be tagged")]
    PrereleaseTag,

    /// `git tag` failed.
    #[error("git tag failed")]
    TagFailed,

    /// `git push` failed.
    #[error("git push failed")]
    PushFailed,

    /// `git push --tags` failed.
    #[error("git push --tags failed")]
    PushTagsFailed,
}

impl ReleaseError {
    /// Process exit code for this failure.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::DetachedHead => 2,
            Self::DirtyTree => 3,
            Self::CommitFailed => 4,
            Self::PrereleaseTag => 5,
            Self::TagFailed => 6,
            Self::PushFailed => 7,
            Self::PushTagsFailed => 8,
        }
    }
}

fn head_is_detached(repo_root: &Utf8Path) -> bool {
    run_git(repo_root, &["symbolic-ref", "-q", "HEAD"]).is_err()
}

fn worktree_dirty(repo_root: &Utf8Path) -> bool {
    run_git(repo_root, &["status", "--porcelain=v1"])
        .map(|out| !out.is_empty())
        .unwrap_or(false)
}

fn has_staged_changes(repo_root: &Utf8Path) -> bool {
    // Exit 1 from `diff --cached --quiet` means something is staged.
    run_git(repo_root, &["diff", "--cached", "--quiet"]).is_err()
}

fn current_branch(repo_root: &Utf8Path) -> Option<String> {
    let out = run_git(repo_root, &["rev-parse", "--abbrev-ref", "HEAD"]).ok()?;
    let branch = out.trim().to_string();
    if branch.is_empty() { None } else { Some(branch) }
}

/// Perform the requested mutations for `new_version`.
///
/// `current_version` feeds the commit message trailer. The `VERSION` file is
/// staged first (unless the new version is a prerelease), then commit, tag,
/// and push run in that order, stopping at the first failure.
#[instrument(skip(opts), fields(repo_root = %repo_root, %new_version))]
pub fn perform(
    opts: &ReleaseOptions,
    repo_root: &Utf8Path,
    new_version: &str,
    current_version: &str,
) -> Result<(), ReleaseError> {
    if opts.requested() && head_is_detached(repo_root) {
        return Err(ReleaseError::DetachedHead);
    }

    if !is_prerelease(new_version) {
        // Stage failure is tolerated: the file may simply not exist yet.
        if let Err(e) = run_git(repo_root, &["add", "--", crate::pipeline::VERSION_FILE]) {
            debug!(error = %e, "could not stage VERSION");
        }
    }

    if opts.commit && !is_prerelease(new_version) {
        if !opts.allow_dirty && worktree_dirty(repo_root) {
            return Err(ReleaseError::DirtyTree);
        }
        if !has_staged_changes(repo_root) {
            // Nothing staged is not an error; the tree already matches.
            warn!("nothing staged, skipping commit");
        } else {
            let title = format!("chore(release): {}{new_version}", opts.tag_prefix);
            let trailer = if current_version == "none" {
                format!("bump: initial version {new_version}")
            } else {
                format!("bump: {current_version} \u{2192} {new_version}")
            };

            let mut args = vec!["commit"];
            if opts.no_verify {
                args.push("--no-verify");
            }
            if opts.sign_commit {
                args.push("-S");
            } else {
                args.push("--no-gpg-sign");
            }
            args.push("-m");
            args.push(&title);
            args.push("-m");
            args.push(&trailer);
            if let Some(ref message) = opts.message {
                args.push("-m");
                args.push(message);
            }

            run_git(repo_root, &args).map_err(|e| {
                warn!(error = %e, "commit failed");
                ReleaseError::CommitFailed
            })?;
            info!(%title, "release commit created");
        }
    }

    if opts.tag {
        if is_prerelease(new_version) {
            return Err(ReleaseError::PrereleaseTag);
        }
        let tag_name = format!("{}{new_version}", opts.tag_prefix);
        let release_message = format!("Release {tag_name}");
        let args: Vec<&str> = if opts.signed_tag {
            vec!["tag", "-s", &tag_name, "-m", &release_message]
        } else if opts.annotated_tag {
            vec!["tag", "-a", &tag_name, "-m", &release_message]
        } else {
            vec!["tag", &tag_name]
        };
        run_git(repo_root, &args).map_err(|e| {
            warn!(error = %e, "tag failed");
            ReleaseError::TagFailed
        })?;
        info!(%tag_name, "tag created");
    }

    if opts.push || opts.push_tags {
        let branch = current_branch(repo_root).unwrap_or_default();
        if opts.push {
            run_git(repo_root, &["push", &opts.remote, &branch])
                .map_err(|_| ReleaseError::PushFailed)?;
        }
        if opts.push_tags {
            run_git(repo_root, &["push", &opts.remote, "--tags"])
                .map_err(|_| ReleaseError::PushTagsFailed)?;
        }
    }

    Ok(())
}
