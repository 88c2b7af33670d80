//! Keyword and marker-phrase extraction.
//!
//! Counts case-insensitive occurrences of breaking-change and security
//! markers in the diff and the commit log, and derives boolean flags from
//! the counts. Markers are plain regex matches; no conventional-commit
//! structure is assumed.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `CLI-BREAKING` / `CLI BREAKING` / `CLIBREAKING` in code or commits.
    static ref CLI_BREAKING_CODE: Regex = Regex::new(r"(?i)CLI[\- ]?BREAKING").unwrap();
    /// Commit phrasing such as `BREAKING: drop the --foo CLI flag`.
    static ref CLI_BREAKING_COMMIT: Regex =
        Regex::new(r"(?i)BREAKING[^A-Za-z0-9]+.*CLI").unwrap();
    /// `API-BREAKING` in code or commits.
    static ref API_BREAKING_CODE: Regex = Regex::new(r"(?i)API[\- ]?BREAKING").unwrap();
    /// Commit phrasing such as `BREAKING - removes the plugin API`.
    static ref API_BREAKING_COMMIT: Regex =
        Regex::new(r"(?i)BREAKING[^A-Za-z0-9]+.*API").unwrap();
    /// `BREAKING CHANGE` and loose `BREAKING ... CHANGE|MAJOR` phrasings.
    static ref GENERAL_BREAKING: Regex =
        Regex::new(r"(?i)BREAKING\s+CHANGE|BREAKING[^A-Za-z0-9]+.*(CHANGE|MAJOR)").unwrap();
    /// A comment line introducing a `SECURITY` marker in the diff.
    static ref SECURITY_COMMENT: Regex =
        Regex::new(r"(?im)(^|\s)[+-]?\s*(//|/\*|#|--)\s*SECURITY").unwrap();
    /// Security vocabulary in commit messages, including CVE identifiers.
    static ref SECURITY_COMMIT: Regex =
        Regex::new(r"(?i)SECURITY|VULNERABILIT(Y|IES)|CVE[\- ]?\d{4}-\d+").unwrap();
    /// `REMOVED OPTION` / `REMOVED OPTIONS` markers in the diff.
    static ref REMOVED_OPTIONS: Regex = Regex::new(r"(?i)REMOVED\s+OPTION(S)?").unwrap();
}

/// Boolean flags and counters derived from marker keywords.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordResults {
    /// A CLI-breaking marker fired in code or commits.
    pub has_cli_breaking: bool,
    /// An API-breaking marker fired in code or commits.
    pub has_api_breaking: bool,
    /// A general breaking-change phrase fired in commits.
    pub has_general_breaking: bool,
    /// Security marker occurrences across diff comments and commit messages.
    pub total_security: u64,
    /// `REMOVED OPTION(S)` marker occurrences in the diff.
    pub removed_options_keywords: u64,
}

fn count(re: &Regex, text: &str) -> u64 {
    re.find_iter(text).count() as u64
}

/// Extract keyword signals from the diff and log streams.
pub fn analyze_keywords(diff: &str, log: &str) -> KeywordResults {
    let cli_breaking = count(&CLI_BREAKING_CODE, diff)
        + count(&CLI_BREAKING_CODE, log)
        + count(&CLI_BREAKING_COMMIT, log);
    let api_breaking = count(&API_BREAKING_CODE, diff)
        + count(&API_BREAKING_CODE, log)
        + count(&API_BREAKING_COMMIT, log);
    let general_breaking = count(&GENERAL_BREAKING, log);
    let total_security = count(&SECURITY_COMMENT, diff) + count(&SECURITY_COMMIT, log);

    KeywordResults {
        has_cli_breaking: cli_breaking > 0,
        has_api_breaking: api_breaking > 0,
        has_general_breaking: general_breaking > 0,
        total_security,
        removed_options_keywords: count(&REMOVED_OPTIONS, diff),
    }
}
