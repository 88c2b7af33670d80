//! File-change statistics for the analyzed range.
//!
//! Counts added/modified/deleted files from name-status records, classifies
//! newly added paths, and totals insertions/deletions from numstat. A
//! `diff --quiet` probe short-circuits the equal-refs case so every counter
//! stays zero.

use camino::Utf8Path;
use tracing::{debug, instrument};

use crate::classify::{FileKind, classify_path};
use crate::git;

/// Aggregated file-change counters for a range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileChangeStats {
    /// Files with status `A`.
    pub added_files: u64,
    /// Files with any status other than `A` or `D` (includes renames/copies).
    pub modified_files: u64,
    /// Files with status `D`.
    pub deleted_files: u64,
    /// Added files classified as source.
    pub new_source_files: u64,
    /// Added files classified as tests.
    pub new_test_files: u64,
    /// Added files classified as documentation.
    pub new_doc_files: u64,
    /// Total inserted lines.
    pub insertions: u64,
    /// Total deleted lines.
    pub deletions: u64,
}

impl FileChangeStats {
    /// Churn: insertions plus deletions.
    pub const fn loc(&self) -> u64 {
        self.insertions + self.deletions
    }
}

/// Compute file-change statistics for `base..target`.
#[instrument(skip(only_paths))]
pub fn compute_stats(
    repo_root: &Utf8Path,
    base: &str,
    target: &str,
    only_paths: Option<&str>,
    ignore_whitespace: bool,
) -> FileChangeStats {
    let mut stats = FileChangeStats::default();

    if git::diff_is_empty(repo_root, base, target, only_paths, ignore_whitespace) {
        debug!("no changes in range");
        return stats;
    }

    for record in git::name_status_records(repo_root, base, target, only_paths, ignore_whitespace)
    {
        match record.status {
            'A' => {
                stats.added_files += 1;
                match classify_path(&record.path) {
                    FileKind::Source => stats.new_source_files += 1,
                    FileKind::Test => stats.new_test_files += 1,
                    FileKind::Doc => stats.new_doc_files += 1,
                    FileKind::Ignored | FileKind::Other => {}
                }
            }
            'D' => stats.deleted_files += 1,
            _ => stats.modified_files += 1,
        }
    }

    let (insertions, deletions) =
        git::numstat_totals(repo_root, base, target, only_paths, ignore_whitespace);
    stats.insertions = insertions;
    stats.deletions = deletions;

    debug!(
        added = stats.added_files,
        modified = stats.modified_files,
        deleted = stats.deleted_files,
        loc = stats.loc(),
        "file change stats"
    );
    stats
}
