//! Base/target reference resolution.
//!
//! Chooses the endpoints of the analyzed range from the user's options, a
//! chain of fallbacks, and merge-base reconciliation. Resolution never
//! fails: an empty repository yields the empty sentinel and unresolvable
//! refs degrade to empty SHAs so the rest of the pipeline reports zeros.

use tracing::{debug, instrument};

use crate::git;
use crate::pipeline::Options;

/// The resolved endpoints of the analyzed range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefResolution {
    /// Effective base ref (possibly replaced by the merge base).
    pub base_ref: String,
    /// Target ref, `HEAD` unless overridden.
    pub target_ref: String,
    /// SHA of the base the selection rules chose, before reconciliation.
    pub requested_base_sha: String,
    /// `merge_base(requested_base, target)` when reconciliation ran.
    pub effective_base_sha: String,
    /// Number of commits in `base..target`.
    pub commit_count: u64,
    /// The repository has no commits at all.
    pub empty_repo: bool,
    /// The base fell back to the root commit of a single-commit history.
    pub single_commit_repo: bool,
    /// Whether `HEAD` resolves to a commit.
    pub has_commits: bool,
}

/// Resolve the analyzed range for `opts`.
#[instrument(skip(opts), fields(repo_root = %opts.repo_root))]
pub fn resolve_refs(opts: &Options) -> RefResolution {
    let mut resolution = RefResolution {
        target_ref: opts.target.clone().unwrap_or_else(|| "HEAD".to_string()),
        ..RefResolution::default()
    };

    resolution.has_commits = git::has_commits(&opts.repo_root);
    if !resolution.has_commits {
        resolution.empty_repo = true;
        debug!("repository has no commits");
        return resolution;
    }

    // First matching rule wins: explicit base, since-commit, since-tag,
    // since-date, last matching tag, HEAD~1, root commit.
    if let Some(base) = &opts.base {
        resolution.base_ref = base.clone();
    } else if let Some(commit) = &opts.since_commit {
        resolution.base_ref = commit.clone();
    } else if let Some(tag) = &opts.since_tag {
        resolution.base_ref = tag.clone();
    } else if let Some(date) = &opts.since_date {
        match git::rev_before_date(&opts.repo_root, date)
            .or_else(|| git::first_commit(&opts.repo_root))
        {
            Some(sha) => resolution.base_ref = sha,
            None => {
                resolution.empty_repo = true;
                return resolution;
            }
        }
    } else if let Some(tag) = git::last_tag_matching(&opts.repo_root, &opts.tag_match) {
        resolution.base_ref = tag;
    } else if let Some(parent) = git::parent_of_head(&opts.repo_root) {
        resolution.base_ref = parent;
    } else if let Some(first) = git::first_commit(&opts.repo_root) {
        resolution.base_ref = first;
        resolution.single_commit_repo = true;
    } else {
        resolution.empty_repo = true;
        return resolution;
    }

    resolution.requested_base_sha = git::rev_parse_commit(&opts.repo_root, &resolution.base_ref)
        .unwrap_or_default();
    let target_sha =
        git::rev_parse_commit(&opts.repo_root, &resolution.target_ref).unwrap_or_default();

    // Reconcile disjoint branches through the merge base unless disabled.
    if !opts.no_merge_base && !resolution.requested_base_sha.is_empty() && !target_sha.is_empty() {
        if let Some(mb) = git::merge_base(
            &opts.repo_root,
            &resolution.requested_base_sha,
            &target_sha,
        ) {
            resolution.effective_base_sha = mb.clone();
            if mb != resolution.requested_base_sha {
                debug!(merge_base = %mb, "base replaced by merge base");
                resolution.base_ref = mb;
            }
        }
    }

    if !resolution.base_ref.is_empty() && !target_sha.is_empty() {
        resolution.commit_count = git::count_commits(
            &opts.repo_root,
            &resolution.base_ref,
            &target_sha,
            opts.first_parent,
        )
        .unwrap_or(0);
    }

    debug!(
        base = %resolution.base_ref,
        target = %resolution.target_ref,
        commits = resolution.commit_count,
        "refs resolved"
    );
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{commit_file, git as run, scratch_repo};
    use camino::Utf8PathBuf;

    fn options_for(root: &Utf8PathBuf) -> Options {
        Options {
            repo_root: root.clone(),
            ..Options::default()
        }
    }

    #[test]
    fn empty_repo_sentinel() {
        let (_tmp, root) = scratch_repo();
        let resolution = resolve_refs(&options_for(&root));
        assert!(resolution.empty_repo);
        assert!(!resolution.has_commits);
        assert_eq!(resolution.target_ref, "HEAD");
        assert_eq!(resolution.base_ref, "");
    }

    #[test]
    fn single_commit_falls_back_to_root() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "init");
        let resolution = resolve_refs(&options_for(&root));
        assert!(!resolution.empty_repo);
        // With exactly one commit there is no HEAD~1 and no tag, so the base
        // is the root commit itself and the range is empty.
        assert!(resolution.single_commit_repo);
        let first = crate::git::first_commit(&root).unwrap();
        assert_eq!(resolution.base_ref, first);
        assert_eq!(resolution.commit_count, 0);
    }

    #[test]
    fn defaults_to_head_parent_without_tags() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        commit_file(&root, "a.txt", "two\n", "second");
        let resolution = resolve_refs(&options_for(&root));
        let parent = crate::git::parent_of_head(&root).unwrap();
        // HEAD~1 resolves and merge-base(HEAD~1, HEAD) == HEAD~1, so the
        // base sticks.
        assert_eq!(resolution.requested_base_sha, parent);
        assert_eq!(resolution.commit_count, 1);
    }

    #[test]
    fn prefers_last_matching_tag() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        run(&root, &["tag", "v0.1.0"]);
        commit_file(&root, "a.txt", "two\n", "second");
        commit_file(&root, "a.txt", "three\n", "third");
        let resolution = resolve_refs(&options_for(&root));
        assert_eq!(resolution.base_ref, "v0.1.0");
        assert_eq!(
            resolution.requested_base_sha,
            crate::git::rev_parse_commit(&root, "v0.1.0").unwrap()
        );
        assert_eq!(resolution.commit_count, 2);
    }

    #[test]
    fn tag_match_glob_filters_tags() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        run(&root, &["tag", "rel-1"]);
        commit_file(&root, "a.txt", "two\n", "second");
        run(&root, &["tag", "v9.9.9"]);
        commit_file(&root, "a.txt", "three\n", "third");

        let mut opts = options_for(&root);
        opts.tag_match = "rel-*".to_string();
        let resolution = resolve_refs(&opts);
        assert_eq!(resolution.commit_count, 2);
    }

    #[test]
    fn explicit_base_wins() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        let first = crate::git::rev_parse_commit(&root, "HEAD").unwrap();
        commit_file(&root, "a.txt", "two\n", "second");
        run(&root, &["tag", "v1.0.0"]);
        commit_file(&root, "a.txt", "three\n", "third");

        let mut opts = options_for(&root);
        opts.base = Some(first.clone());
        let resolution = resolve_refs(&opts);
        assert_eq!(resolution.requested_base_sha, first);
        assert_eq!(resolution.commit_count, 2);
    }

    #[test]
    fn merge_base_reconciles_disjoint_branches() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        let fork = crate::git::rev_parse_commit(&root, "HEAD").unwrap();
        run(&root, &["checkout", "-q", "-b", "side"]);
        commit_file(&root, "side.txt", "side\n", "side work");
        let side_tip = crate::git::rev_parse_commit(&root, "HEAD").unwrap();
        run(&root, &["checkout", "-q", "-"]);
        commit_file(&root, "a.txt", "two\n", "main work");

        let mut opts = options_for(&root);
        opts.base = Some(side_tip.clone());
        let resolution = resolve_refs(&opts);
        // The side branch tip is not an ancestor of HEAD; the effective base
        // becomes the fork point.
        assert_eq!(resolution.effective_base_sha, fork);
        assert_eq!(resolution.base_ref, fork);
    }

    #[test]
    fn no_merge_base_keeps_requested_base() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        run(&root, &["checkout", "-q", "-b", "side"]);
        commit_file(&root, "side.txt", "side\n", "side work");
        let side_tip = crate::git::rev_parse_commit(&root, "HEAD").unwrap();
        run(&root, &["checkout", "-q", "-"]);
        commit_file(&root, "a.txt", "two\n", "main work");

        let mut opts = options_for(&root);
        opts.base = Some(side_tip.clone());
        opts.no_merge_base = true;
        let resolution = resolve_refs(&opts);
        assert_eq!(resolution.base_ref, side_tip);
        assert!(resolution.effective_base_sha.is_empty());
    }

    #[test]
    fn unresolvable_base_degrades_softly() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        let mut opts = options_for(&root);
        opts.base = Some("no-such-ref".to_string());
        let resolution = resolve_refs(&opts);
        assert!(resolution.requested_base_sha.is_empty());
        assert_eq!(resolution.commit_count, 0);
    }

    #[test]
    fn since_date_far_past_uses_first_commit() {
        let (_tmp, root) = scratch_repo();
        commit_file(&root, "a.txt", "one\n", "first");
        commit_file(&root, "a.txt", "two\n", "second");
        let mut opts = options_for(&root);
        opts.since_date = Some("1970-01-02".to_string());
        let resolution = resolve_refs(&opts);
        let first = crate::git::first_commit(&root).unwrap();
        assert_eq!(resolution.requested_base_sha, first);
    }
}
