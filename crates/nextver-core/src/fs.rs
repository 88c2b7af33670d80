//! Confined file reads.
//!
//! Files the analyzer reads from the target repository (`VERSION`, the
//! versioning config) are looked up through [`read_under_root`], which
//! refuses absolute paths, parent traversals, and symlink escapes. Refusal
//! is silent: the caller gets `None` and falls back to its default, keeping
//! the soft-failure contract.

use camino::Utf8Path;
use tracing::debug;

/// Read a file addressed relative to `root`, confined to `root`.
///
/// Returns `None` when the file is absent, unreadable, or when the resolved
/// path escapes the canonicalized root.
pub fn read_under_root(root: &Utf8Path, relative: &str) -> Option<String> {
    let rel = Utf8Path::new(relative);
    if rel.is_absolute() {
        debug!(%relative, "refusing absolute path");
        return None;
    }
    if rel
        .components()
        .any(|component| matches!(component, camino::Utf8Component::ParentDir))
    {
        debug!(%relative, "refusing parent traversal");
        return None;
    }

    let canonical_root = root.as_std_path().canonicalize().ok()?;
    // Canonicalize resolves symlinks, so a link pointing outside the root is
    // caught by the prefix check below.
    let candidate = canonical_root.join(relative).canonicalize().ok()?;
    if !candidate.starts_with(&canonical_root) {
        debug!(%relative, "resolved path escapes root");
        return None;
    }

    std::fs::read_to_string(candidate).ok()
}
