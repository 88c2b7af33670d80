//! Command-line option surface extraction.
//!
//! Works over two diff streams: the unfiltered diff supplies the structural
//! long-option sets, while a diff restricted to C/C++ files feeds the
//! manual (comment/string-excluded) sets and the heuristics: short-option
//! removals, function-prototype removals, and switch-case label deltas.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::hunk_lines;

/// File extensions selecting C/C++ translation units and headers for the
/// manual and heuristic passes.
const C_FAMILY_EXTS: &[&str] = &[".c", ".cc", ".cpp", ".cxx", ".h", ".hh", ".hpp"];

/// Restrict a unified diff to its C/C++ file sections.
///
/// Operates on the already-filtered diff so path restrictions compose with
/// the user's `only-paths` selection.
pub fn c_family_sections(diff: &str) -> String {
    let mut out = String::new();
    let mut keep = false;
    for line in diff.lines() {
        if let Some(header) = line.strip_prefix("diff --git ") {
            let new_path = header.rsplit(" b/").next().unwrap_or("");
            keep = C_FAMILY_EXTS.iter().any(|ext| new_path.ends_with(ext));
        }
        if keep {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

lazy_static! {
    /// A long option spelling: `--name`, `--dry-run`, `--level2`.
    static ref LONG_OPTION: Regex = Regex::new(r"--[A-Za-z0-9][A-Za-z0-9\-]*").unwrap();
    /// A removed line that drops a short option such as ` -d`.
    static ref SHORT_OPTION_REMOVED: Regex =
        Regex::new(r"^-[^+].*[^-]-[A-Za-z](\s|$)").unwrap();
    /// A removed line that looks like a function prototype.
    static ref PROTOTYPE_REMOVED: Regex =
        Regex::new(r"^-[^+].*[A-Za-z_][A-Za-z0-9_\s\*]+\s+[A-Za-z_][A-Za-z0-9_]*\([^;]*\)\s*;\s*$")
            .unwrap();
    /// A switch-case label; the capture is the label itself.
    static ref CASE_LABEL: Regex = Regex::new(r"case\s+([^:\s]+)\s*:").unwrap();
}

/// Results of the CLI option analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliResults {
    /// Any change to the option surface.
    pub cli_changes: bool,
    /// A switch-case label was removed and not re-added.
    pub breaking_cli_changes: bool,
    /// A function prototype disappeared from a header or source file.
    pub api_breaking: bool,
    /// The manual (comment/string-excluded) sets saw changes.
    pub manual_cli_changes: bool,
    /// Removed short options (line count, not deduplicated).
    pub removed_short_count: u64,
    /// Distinct long options on removed lines.
    pub removed_long_count: u64,
    /// Distinct long options on added lines.
    pub added_long_count: u64,
    /// Distinct long options on added lines, comments and strings excluded.
    pub manual_added_long_count: u64,
    /// Distinct long options on removed lines, comments and strings excluded.
    pub manual_removed_long_count: u64,
}

/// Collect the distinct long options on `-` and `+` hunk lines.
///
/// When `exclude_noise` is set, lines that look like comments (after the
/// diff marker and leading whitespace: `//` or `/*`) or that quote an option
/// (both `"` and `--` present) are skipped.
fn long_option_sets(diff: &str, exclude_noise: bool) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut removed = BTreeSet::new();
    let mut added = BTreeSet::new();

    for line in hunk_lines(diff) {
        let (marker, rest) = match line.split_at_checked(1) {
            Some((m @ ("-" | "+"), rest)) => (m, rest),
            _ => continue,
        };

        if exclude_noise {
            let trimmed = rest.trim_start();
            if trimmed.starts_with("//") || trimmed.starts_with("/*") {
                continue;
            }
            if line.contains('"') && line.contains("--") {
                continue;
            }
        }

        let target = if marker == "-" { &mut removed } else { &mut added };
        for m in LONG_OPTION.find_iter(rest) {
            target.insert(m.as_str().to_string());
        }
    }

    (removed, added)
}

/// Collect switch-case labels on removed and added lines.
fn case_label_sets(diff: &str) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut removed = BTreeSet::new();
    let mut added = BTreeSet::new();
    for line in hunk_lines(diff) {
        let target = if line.starts_with('-') {
            &mut removed
        } else if line.starts_with('+') {
            &mut added
        } else {
            continue;
        };
        for captures in CASE_LABEL.captures_iter(line) {
            target.insert(captures[1].to_string());
        }
    }
    (removed, added)
}

/// Analyze CLI option changes.
///
/// `diff` is the full diff for the range; `c_family_diff` the same diff
/// restricted to C/C++ sections (see [`c_family_sections`]).
pub fn analyze_cli_options(diff: &str, c_family_diff: &str) -> CliResults {
    let mut results = CliResults::default();

    let (removed_long, added_long) = long_option_sets(diff, false);
    results.removed_long_count = removed_long.len() as u64;
    results.added_long_count = added_long.len() as u64;

    let (manual_removed, manual_added) = long_option_sets(c_family_diff, true);
    results.manual_removed_long_count = manual_removed.len() as u64;
    results.manual_added_long_count = manual_added.len() as u64;

    for line in hunk_lines(c_family_diff) {
        if SHORT_OPTION_REMOVED.is_match(line) {
            results.removed_short_count += 1;
        }
        if PROTOTYPE_REMOVED.is_match(line) {
            results.api_breaking = true;
        }
    }

    let (removed_cases, added_cases) = case_label_sets(c_family_diff);
    let breaking_by_cases = removed_cases.difference(&added_cases).next().is_some();
    results.breaking_cli_changes = breaking_by_cases;

    // A removed case label without any structurally extracted removal still
    // means an option went away; synthesize one so the removed-option bonus
    // applies downstream.
    if breaking_by_cases
        && results.removed_long_count == 0
        && results.manual_removed_long_count == 0
        && results.removed_short_count == 0
    {
        results.removed_long_count = 1;
    }

    results.manual_cli_changes =
        results.manual_added_long_count > 0 || results.manual_removed_long_count > 0;
    results.cli_changes = results.breaking_cli_changes
        || results.manual_cli_changes
        || results.added_long_count > 0
        || results.removed_long_count > 0
        || results.removed_short_count > 0;

    debug!(
        cli_changes = results.cli_changes,
        breaking = results.breaking_cli_changes,
        removed_long = results.removed_long_count,
        added_long = results.added_long_count,
        removed_short = results.removed_short_count,
        "cli option analysis"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_diff_is_quiet() {
        let results = analyze_cli_options("", "");
        assert_eq!(results, CliResults::default());
    }

    #[test]
    fn added_long_options_are_deduplicated() {
        let diff = "+  {\"verbose\", no_argument, 0, 'v'}, // --verbose\n\
                    +  printf(\"use --verbose or --trace\\n\");\n\
                    +  handle(\"--trace\");\n";
        let results = analyze_cli_options(diff, "");
        assert_eq!(results.added_long_count, 2);
        assert!(results.cli_changes);
        assert!(!results.breaking_cli_changes);
    }

    #[test]
    fn removed_long_options_counted_as_set() {
        let diff = "-  use_opt(\"--alpha\");\n-  use_opt(\"--alpha\");\n-  use_opt(\"--beta\");\n";
        let results = analyze_cli_options(diff, "");
        assert_eq!(results.removed_long_count, 2);
    }

    #[test]
    fn manual_pass_excludes_comments_and_strings() {
        let c_diff = "\
-  // drop --legacy support\n\
-  puts(\"see --help\");\n\
-  legacy_flag = parse(argv, OPT_LEGACY); // --legacy\n";
        // Line 1 is a comment; line 2 quotes the option; line 3's trailing
        // comment is not at line start, so it survives.
        let results = analyze_cli_options("", c_diff);
        assert_eq!(results.manual_removed_long_count, 1);
        assert!(results.manual_cli_changes);
    }

    #[test]
    fn short_option_removal_detected() {
        let c_diff = "-  -d        enable debug output\n";
        let results = analyze_cli_options("", c_diff);
        assert_eq!(results.removed_short_count, 1);
        assert!(results.cli_changes);
    }

    #[test]
    fn prototype_removal_sets_api_breaking() {
        let c_diff = "-int parse_options(int argc, char **argv);\n";
        let results = analyze_cli_options("", c_diff);
        assert!(results.api_breaking);
    }

    #[test]
    fn removed_case_label_is_breaking() {
        let c_diff = "-    case 'd': enable_debug(); break;\n";
        let results = analyze_cli_options("", c_diff);
        assert!(results.breaking_cli_changes);
        assert!(results.cli_changes);
        // No structural removal was seen, so one is synthesized.
        assert_eq!(results.removed_long_count, 1);
    }

    #[test]
    fn readded_case_label_is_not_breaking() {
        let c_diff = "-    case 'd': old_debug(); break;\n+    case 'd': new_debug(); break;\n";
        let results = analyze_cli_options("", c_diff);
        assert!(!results.breaking_cli_changes);
    }

    #[test]
    fn no_synthesis_when_structural_removal_exists() {
        let c_diff = "-    case 'x': break;\n";
        let diff = "-  use_opt(\"--exact\");\n";
        let results = analyze_cli_options(diff, c_diff);
        assert!(results.breaking_cli_changes);
        assert_eq!(results.removed_long_count, 1, "not synthesized on top");
    }

    #[test]
    fn c_family_sections_keep_only_c_files() {
        let diff = "\
diff --git a/src/main.c b/src/main.c\n\
--- a/src/main.c\n\
+++ b/src/main.c\n\
@@ -1 +1 @@\n\
-int old;\n\
+int new;\n\
diff --git a/README.md b/README.md\n\
--- a/README.md\n\
+++ b/README.md\n\
@@ -1 +1 @@\n\
-old docs\n\
+new docs\n\
diff --git a/inc/api.hpp b/inc/api.hpp\n\
--- a/inc/api.hpp\n\
+++ b/inc/api.hpp\n\
@@ -1 +0,0 @@\n\
-void gone();\n";
        let filtered = c_family_sections(diff);
        assert!(filtered.contains("-int old;"));
        assert!(filtered.contains("-void gone();"));
        assert!(!filtered.contains("docs"));
    }

    #[test]
    fn c_family_sections_empty_diff() {
        assert_eq!(c_family_sections(""), "");
    }

    #[test]
    fn hunk_headers_do_not_leak_options() {
        let diff = "--- a/src/main.c\n+++ b/src/main.c\n@@ -1,2 +1,2 @@\n";
        let results = analyze_cli_options(diff, diff);
        assert!(!results.cli_changes);
        assert_eq!(results.removed_long_count, 0);
    }
}
