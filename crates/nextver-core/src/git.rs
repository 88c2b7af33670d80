//! Git subprocess plumbing for the analysis pipeline.
//!
//! Shells out to `git` for all repository access. Arguments are always passed
//! as an argv list, never through a shell, so paths and refs need no
//! quoting. Stdout is captured; stderr is discarded (diagnostics are not
//! parsed, only the exit code is observed).

use std::process::{Command, Stdio};

use camino::Utf8Path;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// Failed to spawn the `git` command.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// `git` returned a non-zero exit code.
    #[error("git {command} exited with status {code}")]
    Command {
        /// The git subcommand that failed (e.g., "rev-parse").
        command: String,
        /// Exit code, or -1 when terminated by a signal.
        code: i32,
    },
}

/// Result alias for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// Run a git command in `repo_root` and return its stdout.
///
/// `color.ui` and `core.quotepath` are forced off so captured output is
/// stable regardless of user configuration.
pub fn run_git(repo_root: &Utf8Path, args: &[&str]) -> GitResult<String> {
    let output = Command::new("git")
        .arg("-c")
        .arg("color.ui=false")
        .arg("-c")
        .arg("core.quotepath=false")
        .arg("-C")
        .arg(repo_root.as_str())
        .args(args)
        .stderr(Stdio::null())
        .output()?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(GitError::Command {
            command: args.first().unwrap_or(&"").to_string(),
            code: output.status.code().unwrap_or(-1),
        })
    }
}

/// Whether the repository has at least one commit reachable from `HEAD`.
#[instrument]
pub fn has_commits(repo_root: &Utf8Path) -> bool {
    let ok = run_git(repo_root, &["rev-parse", "-q", "--verify", "HEAD^{commit}"]).is_ok();
    debug!(ok, "HEAD commit probe");
    ok
}

/// Resolve a ref to a commit SHA. Returns `None` for anything git cannot
/// resolve; unknown refs degrade softly downstream.
#[instrument]
pub fn rev_parse_commit(repo_root: &Utf8Path, reference: &str) -> Option<String> {
    let spec = format!("{reference}^{{commit}}");
    let out = run_git(repo_root, &["rev-parse", "-q", "--verify", &spec]).ok()?;
    let sha = out.trim().to_string();
    if sha.is_empty() { None } else { Some(sha) }
}

/// Most recent common ancestor of two commits.
#[instrument]
pub fn merge_base(repo_root: &Utf8Path, a: &str, b: &str) -> Option<String> {
    let out = run_git(repo_root, &["merge-base", a, b]).ok()?;
    let sha = out.trim().to_string();
    if sha.is_empty() { None } else { Some(sha) }
}

/// Count commits in `base..target`.
#[instrument]
pub fn count_commits(
    repo_root: &Utf8Path,
    base: &str,
    target: &str,
    first_parent: bool,
) -> Option<u64> {
    let range = format!("{base}..{target}");
    let mut args = vec!["rev-list", "--count"];
    if first_parent {
        args.push("--first-parent");
    }
    args.push(&range);
    let out = run_git(repo_root, &args).ok()?;
    out.trim().parse().ok()
}

/// Latest tag matching `pattern`, by `git describe` distance from `HEAD`.
#[instrument]
pub fn last_tag_matching(repo_root: &Utf8Path, pattern: &str) -> Option<String> {
    let out = run_git(
        repo_root,
        &["describe", "--tags", "--abbrev=0", "--match", pattern],
    )
    .ok()?;
    let tag = out.trim().to_string();
    if tag.is_empty() { None } else { Some(tag) }
}

/// Latest commit whose committer date is on or before `date` (end of day).
#[instrument]
pub fn rev_before_date(repo_root: &Utf8Path, date: &str) -> Option<String> {
    let before = format!("--before={date} 23:59:59");
    let out = run_git(repo_root, &["rev-list", "-1", &before, "HEAD"]).ok()?;
    let sha = out.trim().to_string();
    if sha.is_empty() { None } else { Some(sha) }
}

/// The root commit of the history reachable from `HEAD`.
#[instrument]
pub fn first_commit(repo_root: &Utf8Path) -> Option<String> {
    let out = run_git(repo_root, &["rev-list", "--max-parents=0", "HEAD"]).ok()?;
    // A history with multiple roots lists one per line; take the first.
    let sha = out.lines().next().map(str::trim).unwrap_or_default();
    if sha.is_empty() {
        None
    } else {
        Some(sha.to_string())
    }
}

/// `HEAD~1`, when it exists.
#[instrument]
pub fn parent_of_head(repo_root: &Utf8Path) -> Option<String> {
    let out = run_git(repo_root, &["rev-parse", "-q", "--verify", "HEAD~1"]).ok()?;
    let sha = out.trim().to_string();
    if sha.is_empty() { None } else { Some(sha) }
}

/// Split a comma-separated pathspec list into trimmed, non-empty entries.
fn pathspec_entries(only_paths: Option<&str>) -> Vec<String> {
    only_paths
        .map(|csv| {
            csv.split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Append shared diff selection arguments: whitespace flag, range, pathspec.
fn push_diff_args<'a>(
    args: &mut Vec<&'a str>,
    range: &'a str,
    paths: &'a [String],
    ignore_whitespace: bool,
) {
    if ignore_whitespace {
        args.push("-w");
    }
    args.push(range);
    if !paths.is_empty() {
        args.push("--");
        for path in paths {
            args.push(path.as_str());
        }
    }
}

/// Unified diff for `base..target` with zero context and rename/copy
/// detection. Returns an empty string when the diff cannot be produced.
#[instrument(skip(only_paths))]
pub fn diff_text(
    repo_root: &Utf8Path,
    base: &str,
    target: &str,
    only_paths: Option<&str>,
    ignore_whitespace: bool,
) -> String {
    let range = format!("{base}..{target}");
    let paths = pathspec_entries(only_paths);
    let mut args = vec!["diff", "-M", "-C", "--unified=0", "--no-ext-diff"];
    push_diff_args(&mut args, &range, &paths, ignore_whitespace);
    run_git(repo_root, &args).unwrap_or_default()
}

/// Whether `base..target` contains no change at all under the filters.
///
/// Uses `diff --quiet`: exit 0 means no difference.
#[instrument(skip(only_paths))]
pub fn diff_is_empty(
    repo_root: &Utf8Path,
    base: &str,
    target: &str,
    only_paths: Option<&str>,
    ignore_whitespace: bool,
) -> bool {
    let range = format!("{base}..{target}");
    let paths = pathspec_entries(only_paths);
    let mut args = vec!["diff", "-M", "-C", "--quiet"];
    push_diff_args(&mut args, &range, &paths, ignore_whitespace);
    run_git(repo_root, &args).is_ok()
}

/// One record from `git diff --name-status -z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameStatusRecord {
    /// Status letter: `A`, `M`, `D`, `R`, `C`, ...
    pub status: char,
    /// The path of the record. For renames and copies this is the
    /// destination path.
    pub path: String,
}

/// Name-status records for `base..target`, with rename/copy detection.
#[instrument(skip(only_paths))]
pub fn name_status_records(
    repo_root: &Utf8Path,
    base: &str,
    target: &str,
    only_paths: Option<&str>,
    ignore_whitespace: bool,
) -> Vec<NameStatusRecord> {
    let range = format!("{base}..{target}");
    let paths = pathspec_entries(only_paths);
    let mut args = vec!["diff", "-M", "-C", "--name-status", "-z"];
    push_diff_args(&mut args, &range, &paths, ignore_whitespace);
    let raw = run_git(repo_root, &args).unwrap_or_default();

    let mut records = Vec::new();
    let mut fields = raw.split('\0').filter(|field| !field.is_empty());
    while let Some(status_field) = fields.next() {
        let Some(status) = status_field.chars().next() else {
            break;
        };
        // Rename and copy records carry two paths; the second is the
        // destination.
        let path = if status == 'R' || status == 'C' {
            let _source = fields.next();
            fields.next()
        } else {
            fields.next()
        };
        let Some(path) = path else { break };
        records.push(NameStatusRecord {
            status,
            path: path.to_string(),
        });
    }
    debug!(count = records.len(), "name-status records");
    records
}

/// Total insertions and deletions for `base..target` from `diff --numstat`.
///
/// Binary entries report `-` per side and contribute zero.
#[instrument(skip(only_paths))]
pub fn numstat_totals(
    repo_root: &Utf8Path,
    base: &str,
    target: &str,
    only_paths: Option<&str>,
    ignore_whitespace: bool,
) -> (u64, u64) {
    let range = format!("{base}..{target}");
    let paths = pathspec_entries(only_paths);
    let mut args = vec!["diff", "-M", "-C", "--numstat"];
    push_diff_args(&mut args, &range, &paths, ignore_whitespace);
    let raw = run_git(repo_root, &args).unwrap_or_default();

    let mut insertions = 0u64;
    let mut deletions = 0u64;
    for line in raw.lines() {
        let mut cols = line.split('\t');
        let (Some(ins), Some(del)) = (cols.next(), cols.next()) else {
            continue;
        };
        insertions += ins.parse::<u64>().unwrap_or(0);
        deletions += del.parse::<u64>().unwrap_or(0);
    }
    (insertions, deletions)
}

/// Commit messages for `base..target`, one `subject body` record per commit.
#[instrument]
pub fn log_subject_body(
    repo_root: &Utf8Path,
    base: &str,
    target: &str,
    no_merges: bool,
) -> String {
    let range = format!("{base}..{target}");
    let mut args = vec!["log"];
    if no_merges {
        args.push("--no-merges");
    }
    args.push("--format=%s %b");
    args.push(&range);
    run_git(repo_root, &args).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{commit_file, scratch_repo};

    #[test]
    fn has_commits_false_on_fresh_repo() {
        let (_tmp, root) = scratch_repo();
        assert!(!has_commits(&root));
    }

    #[test]
    fn has_commits_true_after_commit() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "hello\n", "init");
        assert!(has_commits(&root));
    }

    #[test]
    fn rev_parse_unknown_ref_is_none() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "hello\n", "init");
        assert!(rev_parse_commit(&root, "no-such-ref").is_none());
        assert!(rev_parse_commit(&root, "HEAD").is_some());
    }

    #[test]
    fn count_commits_in_range() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        let base = rev_parse_commit(&root, "HEAD").unwrap();
        commit_file(&root, "a.txt", "two\n", "second");
        commit_file(&root, "a.txt", "three\n", "third");
        assert_eq!(count_commits(&root, &base, "HEAD", false), Some(2));
    }

    #[test]
    fn first_commit_is_root() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        let first = rev_parse_commit(&root, "HEAD").unwrap();
        commit_file(&root, "a.txt", "two\n", "second");
        assert_eq!(first_commit(&root), Some(first));
    }

    #[test]
    fn diff_text_reports_changed_lines() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        let base = rev_parse_commit(&root, "HEAD").unwrap();
        commit_file(&root, "a.txt", "two\n", "second");
        let diff = diff_text(&root, &base, "HEAD", None, false);
        assert!(diff.contains("-one"));
        assert!(diff.contains("+two"));
    }

    #[test]
    fn diff_is_empty_on_equal_refs() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        assert!(diff_is_empty(&root, "HEAD", "HEAD", None, false));
    }

    #[test]
    fn name_status_distinguishes_added_and_modified() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        let base = rev_parse_commit(&root, "HEAD").unwrap();
        std::fs::write(root.join("a.txt"), "two\n").unwrap();
        std::fs::write(root.join("b.txt"), "new\n").unwrap();
        crate::testutil::git(&root, &["add", "."]);
        crate::testutil::git(&root, &["commit", "-q", "-m", "second"]);

        let mut records = name_status_records(&root, &base, "HEAD", None, false);
        records.sort_by(|a, b| a.path.cmp(&b.path));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, 'M');
        assert_eq!(records[0].path, "a.txt");
        assert_eq!(records[1].status, 'A');
        assert_eq!(records[1].path, "b.txt");
    }

    #[test]
    fn numstat_counts_insertions_and_deletions() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\ntwo\n", "first");
        let base = rev_parse_commit(&root, "HEAD").unwrap();
        commit_file(&root, "a.txt", "one\nthree\nfour\n", "second");
        let (ins, del) = numstat_totals(&root, &base, "HEAD", None, false);
        assert_eq!((ins, del), (2, 1));
    }

    #[test]
    fn log_subject_body_one_record_per_commit() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        let base = rev_parse_commit(&root, "HEAD").unwrap();
        commit_file(&root, "a.txt", "two\n", "add feature");
        let log = log_subject_body(&root, &base, "HEAD", false);
        assert!(log.contains("add feature"));
        assert!(!log.contains("first"));
    }
}
