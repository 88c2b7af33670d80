//! Library interface for the `nextver` CLI.
//!
//! This crate exposes the argument parser as a library, primarily for
//! documentation generation and testing. The actual entry point is in
//! `main.rs`; all analysis logic lives in `nextver-core`.

pub mod output;

use camino::Utf8PathBuf;
use clap::{CommandFactory, Parser};
use nextver_core::pipeline::Options;
use nextver_core::release::ReleaseOptions;

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                Log filter (e.g., debug, nextver=trace)
";

/// Command-line interface definition for nextver.
#[derive(Parser, Debug)]
#[command(name = "nextver")]
#[command(about = "Suggest the next semantic version from repository changes", long_about = None)]
#[command(version)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// Analyze changes since a specific tag (default: last matching tag)
    #[arg(long, visible_alias = "since-tag", value_name = "TAG")]
    pub since: Option<String>,

    /// Analyze changes since a specific commit
    #[arg(long, value_name = "HASH")]
    pub since_commit: Option<String>,

    /// Analyze changes since a specific date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub since_date: Option<String>,

    /// Base reference for the comparison (default: auto-detected)
    #[arg(long, value_name = "REF")]
    pub base: Option<String>,

    /// Target reference for the comparison (default: HEAD)
    #[arg(long, value_name = "REF")]
    pub target: Option<String>,

    /// Repository root directory for the analysis
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub repo_root: Utf8PathBuf,

    /// Glob pattern for the default last-tag lookup
    #[arg(long, value_name = "GLOB", default_value = "*")]
    pub tag_match: String,

    /// Count commits along the first parent only
    #[arg(long)]
    pub first_parent: bool,

    /// Disable automatic merge-base detection for disjoint branches
    #[arg(long)]
    pub no_merge_base: bool,

    /// Restrict analysis to comma-separated path globs
    #[arg(long, value_name = "CSV")]
    pub only_paths: Option<String>,

    /// Ignore whitespace changes in diff analysis
    #[arg(long)]
    pub ignore_whitespace: bool,

    /// More detail on stderr (repeatable; e.g. -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors on stderr
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output machine-readable key=value
    #[arg(long)]
    pub machine: bool,

    /// Output machine-readable JSON
    #[arg(long)]
    pub json: bool,

    /// Output only the suggestion (major/minor/patch/none)
    #[arg(long)]
    pub suggest_only: bool,

    /// Use taxonomy exit codes even with --suggest-only
    #[arg(long)]
    pub strict_status: bool,

    /// Create a commit with the VERSION update (skipped for prerelease)
    #[arg(long)]
    pub commit: bool,

    /// Create a git tag (skipped for prerelease)
    #[arg(long)]
    pub tag: bool,

    /// Push the current branch to the remote
    #[arg(long)]
    pub push: bool,

    /// Push all tags to the remote
    #[arg(long)]
    pub push_tags: bool,

    /// Allow a dirty working tree when committing
    #[arg(long)]
    pub allow_dirty: bool,

    /// GPG-sign the release commit
    #[arg(long)]
    pub sign_commit: bool,

    /// Create a lightweight tag instead of an annotated one
    #[arg(long)]
    pub lightweight_tag: bool,

    /// Create a signed tag
    #[arg(long)]
    pub signed_tag: bool,

    /// Skip git hooks on commit
    #[arg(long)]
    pub no_verify: bool,

    /// Remote name for pushes
    #[arg(long, value_name = "NAME", default_value = "origin")]
    pub remote: String,

    /// Prefix for tag names
    #[arg(long, value_name = "PFX", default_value = "v")]
    pub tag_prefix: String,

    /// Extra commit message paragraph
    #[arg(long, value_name = "MSG")]
    pub message: Option<String>,
}

/// How the report is rendered. Selected once at the boundary; the
/// suggestion-only form wins over JSON, which wins over key=value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// A single `major|minor|patch|none` line.
    SuggestOnly,
    /// The full JSON report.
    Json,
    /// One `SUGGESTION=<kind>` line.
    Machine,
    /// The human-readable report.
    Human,
}

impl Cli {
    /// Resolve the output mode from the flags.
    pub const fn output_mode(&self) -> OutputMode {
        if self.suggest_only {
            OutputMode::SuggestOnly
        } else if self.json {
            OutputMode::Json
        } else if self.machine {
            OutputMode::Machine
        } else {
            OutputMode::Human
        }
    }

    /// Analysis options for the core pipeline.
    pub fn analysis_options(&self) -> Options {
        Options {
            repo_root: self.repo_root.clone(),
            base: self.base.clone(),
            target: self.target.clone(),
            since_commit: self.since_commit.clone(),
            since_tag: self.since.clone(),
            since_date: self.since_date.clone(),
            tag_match: self.tag_match.clone(),
            first_parent: self.first_parent,
            no_merge_base: self.no_merge_base,
            only_paths: self.only_paths.clone(),
            ignore_whitespace: self.ignore_whitespace,
        }
    }

    /// Mutation options for the release phase.
    pub fn release_options(&self) -> ReleaseOptions {
        ReleaseOptions {
            commit: self.commit,
            tag: self.tag,
            push: self.push,
            push_tags: self.push_tags,
            allow_dirty: self.allow_dirty,
            sign_commit: self.sign_commit,
            annotated_tag: !self.lightweight_tag,
            signed_tag: self.signed_tag,
            no_verify: self.no_verify,
            remote: self.remote.clone(),
            tag_prefix: self.tag_prefix.clone(),
            message: self.message.clone(),
        }
    }
}

/// Returns the clap command for documentation generation.
pub fn command() -> clap::Command {
    Cli::command()
}
