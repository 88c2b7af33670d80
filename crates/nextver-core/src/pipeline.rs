//! The analysis pipeline.
//!
//! One synchronous pass per run: resolve refs, mine the diff and log,
//! score, classify, and compute the next version. Every stage fails soft:
//! a run always produces an [`Analysis`], falling back to sentinels
//! (`base_ref = "EMPTY"`, `current_version = "0.0.0"`) when the repository
//! gives nothing to analyze.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, instrument};

use crate::analyze::cli_options::{self, CliResults};
use crate::analyze::keywords::{self, KeywordResults};
use crate::analyze::security::{self, SecurityResults};
use crate::bump::{self, BumpKind, MAIN_MOD};
use crate::config::{self, ConfigValues};
use crate::git;
use crate::refs::{self, RefResolution};
use crate::score::{self, Suggestion};
use crate::stats::{self, FileChangeStats};

/// Sentinel base ref rendered for a repository without commits.
pub const EMPTY_BASE: &str = "EMPTY";

/// Name of the version file read from the repository root.
pub const VERSION_FILE: &str = "VERSION";

/// Analysis options, as resolved from the command line.
#[derive(Debug, Clone)]
pub struct Options {
    /// Repository to analyze.
    pub repo_root: Utf8PathBuf,
    /// Explicit base ref.
    pub base: Option<String>,
    /// Explicit target ref (default `HEAD`).
    pub target: Option<String>,
    /// Base from a commit hash.
    pub since_commit: Option<String>,
    /// Base from a tag.
    pub since_tag: Option<String>,
    /// Base from a `YYYY-MM-DD` date.
    pub since_date: Option<String>,
    /// Glob for the default last-tag lookup.
    pub tag_match: String,
    /// Count commits along the first parent only.
    pub first_parent: bool,
    /// Disable merge-base reconciliation.
    pub no_merge_base: bool,
    /// Comma-separated pathspec filters.
    pub only_paths: Option<String>,
    /// Suppress whitespace-only differences.
    pub ignore_whitespace: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            repo_root: Utf8PathBuf::from("."),
            base: None,
            target: None,
            since_commit: None,
            since_tag: None,
            since_date: None,
            tag_match: "*".to_string(),
            first_parent: false,
            no_merge_base: false,
            only_paths: None,
            ignore_whitespace: false,
        }
    }
}

/// Per-kind combined deltas, reported alongside the chosen bump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocDeltas {
    /// Delta a patch bump would apply.
    pub patch_delta: i64,
    /// Delta a minor bump would apply.
    pub minor_delta: i64,
    /// Delta a major bump would apply.
    pub major_delta: i64,
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Resolved range endpoints.
    pub refs: RefResolution,
    /// Base ref as rendered in reports (`EMPTY` for a commitless repo).
    pub base_ref: String,
    /// Target ref as rendered in reports.
    pub target_ref: String,
    /// File-change counters.
    pub stats: FileChangeStats,
    /// CLI option signals.
    pub cli: CliResults,
    /// Security signals.
    pub security: SecurityResults,
    /// Keyword signals.
    pub keywords: KeywordResults,
    /// Effective scoring configuration.
    pub config: ConfigValues,
    /// Accumulated bonus.
    pub total_bonus: i64,
    /// The categorical outcome.
    pub suggestion: Suggestion,
    /// Current version from the `VERSION` file, `0.0.0` when absent.
    pub current_version: String,
    /// Next version, absent when the suggestion is `none`.
    pub next_version: Option<String>,
    /// Churn over the filtered diff.
    pub loc: i64,
    /// Per-kind deltas for the machine report.
    pub loc_deltas: LocDeltas,
}

/// Read the current version from the repository's `VERSION` file.
///
/// Only a bare dotted triplet of digits is accepted; anything else (a
/// missing file, a confinement refusal, stray characters) reads as
/// `0.0.0`.
pub fn read_current_version(repo_root: &Utf8Path) -> String {
    let fallback = "0.0.0".to_string();
    let Some(raw) = crate::fs::read_under_root(repo_root, VERSION_FILE) else {
        return fallback;
    };
    let trimmed = raw.trim();
    let digits_and_dots = trimmed.chars().all(|c| c.is_ascii_digit() || c == '.');
    if digits_and_dots && trimmed.matches('.').count() == 2 && !trimmed.is_empty() {
        trimmed.to_string()
    } else {
        debug!(contents = %trimmed, "ignoring malformed VERSION file");
        fallback
    }
}

impl Suggestion {
    const fn bump_kind(self) -> Option<BumpKind> {
        match self {
            Self::Patch => Some(BumpKind::Patch),
            Self::Minor => Some(BumpKind::Minor),
            Self::Major => Some(BumpKind::Major),
            Self::None => None,
        }
    }
}

/// Run the full analysis pipeline.
#[instrument(skip(opts), fields(repo_root = %opts.repo_root))]
pub fn run(opts: &Options) -> Analysis {
    let resolution = refs::resolve_refs(opts);

    let (base_ref, target_ref) = if resolution.empty_repo {
        (EMPTY_BASE.to_string(), "HEAD".to_string())
    } else {
        (resolution.base_ref.clone(), resolution.target_ref.clone())
    };

    let (stats, cli, security, keywords) = if resolution.empty_repo {
        (
            FileChangeStats::default(),
            CliResults::default(),
            SecurityResults::default(),
            KeywordResults::default(),
        )
    } else {
        let root = &opts.repo_root;
        let only = opts.only_paths.as_deref();
        let ws = opts.ignore_whitespace;

        let stats = stats::compute_stats(root, &base_ref, &target_ref, only, ws);
        let diff = git::diff_text(root, &base_ref, &target_ref, only, ws);
        let c_family_diff = cli_options::c_family_sections(&diff);
        let log = git::log_subject_body(root, &base_ref, &target_ref, false);

        let cli = cli_options::analyze_cli_options(&diff, &c_family_diff);
        let security = security::analyze_security(&diff, &log);
        let keywords = keywords::analyze_keywords(&diff, &log);
        (stats, cli, security, keywords)
    };

    let config = config::load_config_or_default(&opts.repo_root);
    let total_bonus = score::total_bonus(&stats, &cli, &security, &keywords, &config);
    let suggestion = score::classify(total_bonus, &config);

    let current_version = read_current_version(&opts.repo_root);
    let loc = stats.loc() as i64;

    let next_version = suggestion.bump_kind().map(|kind| {
        bump::bump_version(&current_version, kind, loc, total_bonus, &config, MAIN_MOD)
    });

    let loc_deltas = LocDeltas {
        patch_delta: bump::total_delta(BumpKind::Patch, loc, total_bonus, &config),
        minor_delta: bump::total_delta(BumpKind::Minor, loc, total_bonus, &config),
        major_delta: bump::total_delta(BumpKind::Major, loc, total_bonus, &config),
    };

    info!(
        base = %base_ref,
        target = %target_ref,
        total_bonus,
        suggestion = %suggestion,
        security_risk = %security.risk(),
        "analysis complete"
    );

    Analysis {
        refs: resolution,
        base_ref,
        target_ref,
        stats,
        cli,
        security,
        keywords,
        config,
        total_bonus,
        suggestion,
        current_version,
        next_version,
        loc,
        loc_deltas,
    }
}
