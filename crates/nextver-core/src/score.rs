//! Bonus scoring and bump classification.
//!
//! Folds the extractor records into a single `total_bonus` using the
//! configured weights, then thresholds the total into a suggestion. Each
//! weight is applied at most once, except the per-occurrence security
//! weight.

use tracing::debug;

use crate::analyze::cli_options::CliResults;
use crate::analyze::keywords::KeywordResults;
use crate::analyze::security::SecurityResults;
use crate::config::ConfigValues;
use crate::stats::FileChangeStats;

/// The categorical outcome of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suggestion {
    /// Nothing worth a release.
    None,
    /// Patch-level change.
    Patch,
    /// Minor-level change.
    Minor,
    /// Major-level change.
    Major,
}

impl Suggestion {
    /// Lowercase name as emitted in reports.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulate the total bonus from the extractor records.
pub fn total_bonus(
    stats: &FileChangeStats,
    cli: &CliResults,
    security: &SecurityResults,
    keywords: &KeywordResults,
    cfg: &ConfigValues,
) -> i64 {
    let mut bonus = 0i64;

    if keywords.has_cli_breaking || cli.breaking_cli_changes {
        bonus += cfg.bonus_breaking_cli;
    }
    if keywords.has_api_breaking || cli.api_breaking {
        bonus += cfg.bonus_api_breaking;
    }
    // General breaking reuses the API weight; a dedicated weight would need
    // care not to double-count with the branch above.
    if keywords.has_general_breaking {
        bonus += cfg.bonus_api_breaking;
    }

    let total_security = security
        .security_keywords_commits
        .max(keywords.total_security);
    if total_security > 0 {
        bonus += total_security as i64 * cfg.bonus_security;
    }

    if cli.cli_changes {
        bonus += cfg.bonus_cli_changes;
    }
    if cli.manual_cli_changes {
        bonus += cfg.bonus_manual_cli;
    }
    if stats.new_source_files > 0 {
        bonus += cfg.bonus_new_source;
    }
    if stats.new_test_files > 0 {
        bonus += cfg.bonus_new_test;
    }
    if stats.new_doc_files > 0 {
        bonus += cfg.bonus_new_doc;
    }

    let removed_total = cli.removed_short_count
        + cli.removed_long_count
        + cli.manual_removed_long_count
        + keywords.removed_options_keywords;
    if removed_total > 0 {
        bonus += cfg.bonus_removed_option;
    }

    debug!(bonus, total_security, removed_total, "total bonus");
    bonus
}

/// Threshold the total bonus into a suggestion.
pub fn classify(total_bonus: i64, cfg: &ConfigValues) -> Suggestion {
    if total_bonus >= cfg.major_bonus_threshold {
        Suggestion::Major
    } else if total_bonus >= cfg.minor_bonus_threshold {
        Suggestion::Minor
    } else if total_bonus > cfg.patch_bonus_threshold {
        Suggestion::Patch
    } else {
        Suggestion::None
    }
}

/// Process exit code for a suggestion under the output-mode policy.
///
/// `--suggest-only` without `--strict-status` and `--json` always succeed;
/// otherwise the suggestion maps to a taxonomy code.
pub const fn exit_code(
    suggestion: Suggestion,
    suggest_only: bool,
    strict_status: bool,
    json: bool,
) -> i32 {
    if suggest_only && !strict_status {
        return 0;
    }
    if json {
        return 0;
    }
    match suggestion {
        Suggestion::Major => 10,
        Suggestion::Minor => 11,
        Suggestion::Patch => 12,
        Suggestion::None => 20,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ConfigValues {
        ConfigValues::default()
    }

    #[test]
    fn quiet_inputs_score_zero() {
        let bonus = total_bonus(
            &FileChangeStats::default(),
            &CliResults::default(),
            &SecurityResults::default(),
            &KeywordResults::default(),
            &cfg(),
        );
        assert_eq!(bonus, 0);
        assert_eq!(classify(bonus, &cfg()), Suggestion::None);
    }

    #[test]
    fn breaking_cli_plus_removed_option() {
        let cli = CliResults {
            cli_changes: true,
            breaking_cli_changes: true,
            removed_long_count: 1,
            ..CliResults::default()
        };
        let bonus = total_bonus(
            &FileChangeStats::default(),
            &cli,
            &SecurityResults::default(),
            &KeywordResults::default(),
            &cfg(),
        );
        // breaking_cli (4) + cli_changes (2) + removed_option (3)
        assert_eq!(bonus, 9);
        assert_eq!(classify(bonus, &cfg()), Suggestion::Major);
    }

    #[test]
    fn breaking_weight_not_doubled_by_keyword_and_extractor() {
        let cli = CliResults {
            breaking_cli_changes: true,
            ..CliResults::default()
        };
        let kw = KeywordResults {
            has_cli_breaking: true,
            ..KeywordResults::default()
        };
        let bonus = total_bonus(
            &FileChangeStats::default(),
            &cli,
            &SecurityResults::default(),
            &kw,
            &cfg(),
        );
        assert_eq!(bonus, 4);
    }

    #[test]
    fn general_breaking_reuses_api_weight() {
        let kw = KeywordResults {
            has_api_breaking: true,
            has_general_breaking: true,
            ..KeywordResults::default()
        };
        let bonus = total_bonus(
            &FileChangeStats::default(),
            &CliResults::default(),
            &SecurityResults::default(),
            &kw,
            &cfg(),
        );
        assert_eq!(bonus, 10);
    }

    #[test]
    fn security_scales_per_occurrence() {
        let kw = KeywordResults {
            total_security: 2,
            ..KeywordResults::default()
        };
        let bonus = total_bonus(
            &FileChangeStats::default(),
            &CliResults::default(),
            &SecurityResults::default(),
            &kw,
            &cfg(),
        );
        assert_eq!(bonus, 10);
        assert_eq!(classify(bonus, &cfg()), Suggestion::Major);
    }

    #[test]
    fn security_takes_max_of_sources() {
        let security = SecurityResults {
            security_keywords_commits: 3,
            ..SecurityResults::default()
        };
        let kw = KeywordResults {
            total_security: 1,
            ..KeywordResults::default()
        };
        let bonus = total_bonus(
            &FileChangeStats::default(),
            &CliResults::default(),
            &security,
            &kw,
            &cfg(),
        );
        assert_eq!(bonus, 15);
    }

    #[test]
    fn new_file_bonuses() {
        let stats = FileChangeStats {
            new_source_files: 2,
            new_test_files: 1,
            new_doc_files: 1,
            ..FileChangeStats::default()
        };
        let bonus = total_bonus(
            &stats,
            &CliResults::default(),
            &SecurityResults::default(),
            &KeywordResults::default(),
            &cfg(),
        );
        // Flat bonuses: multiple new source files still score once.
        assert_eq!(bonus, 3);
        assert_eq!(classify(bonus, &cfg()), Suggestion::Patch);
    }

    #[test]
    fn removed_options_keyword_alone_triggers_removed_bonus() {
        let kw = KeywordResults {
            removed_options_keywords: 1,
            ..KeywordResults::default()
        };
        let bonus = total_bonus(
            &FileChangeStats::default(),
            &CliResults::default(),
            &SecurityResults::default(),
            &kw,
            &cfg(),
        );
        assert_eq!(bonus, 3);
    }

    #[test]
    fn classification_thresholds() {
        let cfg = cfg();
        assert_eq!(classify(0, &cfg), Suggestion::None);
        assert_eq!(classify(1, &cfg), Suggestion::Patch);
        assert_eq!(classify(3, &cfg), Suggestion::Patch);
        assert_eq!(classify(4, &cfg), Suggestion::Minor);
        assert_eq!(classify(7, &cfg), Suggestion::Minor);
        assert_eq!(classify(8, &cfg), Suggestion::Major);
    }

    #[test]
    fn exit_code_policy() {
        assert_eq!(exit_code(Suggestion::Major, false, false, false), 10);
        assert_eq!(exit_code(Suggestion::Minor, false, false, false), 11);
        assert_eq!(exit_code(Suggestion::Patch, false, false, false), 12);
        assert_eq!(exit_code(Suggestion::None, false, false, false), 20);
        // suggest-only is always zero unless strict.
        assert_eq!(exit_code(Suggestion::Major, true, false, false), 0);
        assert_eq!(exit_code(Suggestion::Major, true, true, false), 10);
        // json is always zero.
        assert_eq!(exit_code(Suggestion::None, false, false, true), 0);
    }
}
