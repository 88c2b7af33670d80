//! Semver validation and precedence comparison.
//!
//! Thin wrappers over the `semver` crate, exposed both for internal
//! sanity checks and as library primitives. Build metadata never
//! participates in ordering.

use std::cmp::Ordering;

use semver::Version;
use thiserror::Error;

/// Errors from version operations.
#[derive(Error, Debug)]
pub enum VersionError {
    /// Failed to parse a semver string.
    #[error("invalid semver: {0}")]
    InvalidSemver(#[from] semver::Error),
}

/// Result alias for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

/// Parse a version string, stripping an optional `v` prefix.
pub fn parse_version(s: &str) -> VersionResult<Version> {
    let s = s.strip_prefix('v').unwrap_or(s);
    Ok(Version::parse(s)?)
}

/// Whether `s` is a bare `MAJOR.MINOR.PATCH` triplet — no prerelease, no
/// build metadata, no leading zeros.
pub fn is_semver_core(s: &str) -> bool {
    Version::parse(s).is_ok_and(|v| v.pre.is_empty() && v.build.is_empty())
}

/// Whether `s` is a full semver: core triplet plus optional `-prerelease`
/// and `+build` segments of dot-separated `[0-9A-Za-z-]+` identifiers.
pub fn is_semver(s: &str) -> bool {
    Version::parse(s).is_ok()
}

/// Whether the version carries a prerelease marker.
///
/// Detected by the presence of `-`, matching the bump pipeline's cheap check
/// for strings that may not parse as full semver.
pub fn is_prerelease(s: &str) -> bool {
    s.contains('-')
}

/// Compare two versions by semver precedence, ignoring build metadata.
///
/// A release outranks any of its prereleases; prerelease identifier lists
/// compare pairwise (numeric before alphanumeric, shorter prefix first).
pub fn compare(a: &str, b: &str) -> VersionResult<Ordering> {
    let a = parse_version(a)?;
    let b = parse_version(b)?;
    Ok(a.cmp_precedence(&b))
}
