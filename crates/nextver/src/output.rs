//! Report rendering.
//!
//! Four renderers selected at the boundary. The suggest-only, machine, and
//! human formats are byte-exact contracts consumed by scripts; the JSON
//! report serializes a struct whose field order is the wire order.

use serde::Serialize;

use crate::OutputMode;
use nextver_core::pipeline::Analysis;

/// The JSON report. Field declaration order is the output key order.
#[derive(Serialize)]
struct JsonReport<'a> {
    suggestion: &'a str,
    current_version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_version: Option<&'a str>,
    total_bonus: i64,
    manual_cli_changes: bool,
    manual_added_long_count: u64,
    manual_removed_long_count: u64,
    base_ref: &'a str,
    target_ref: &'a str,
    loc_delta: JsonLocDelta,
}

#[derive(Serialize)]
struct JsonLocDelta {
    patch_delta: i64,
    minor_delta: i64,
    major_delta: i64,
}

/// Render the analysis in the requested mode. The returned string is the
/// complete stdout payload, trailing newline included.
pub fn render(mode: OutputMode, analysis: &Analysis) -> String {
    match mode {
        OutputMode::SuggestOnly => format!("{}\n", analysis.suggestion),
        OutputMode::Machine => format!("SUGGESTION={}\n", analysis.suggestion),
        OutputMode::Json => render_json(analysis),
        OutputMode::Human => render_human(analysis),
    }
}

fn render_json(analysis: &Analysis) -> String {
    let report = JsonReport {
        suggestion: analysis.suggestion.as_str(),
        current_version: &analysis.current_version,
        next_version: analysis.next_version.as_deref(),
        total_bonus: analysis.total_bonus,
        manual_cli_changes: analysis.cli.manual_cli_changes,
        manual_added_long_count: analysis.cli.manual_added_long_count,
        manual_removed_long_count: analysis.cli.manual_removed_long_count,
        base_ref: &analysis.base_ref,
        target_ref: &analysis.target_ref,
        loc_delta: JsonLocDelta {
            patch_delta: analysis.loc_deltas.patch_delta,
            minor_delta: analysis.loc_deltas.minor_delta,
            major_delta: analysis.loc_deltas.major_delta,
        },
    };
    let mut out = serde_json::to_string_pretty(&report)
        .expect("report serialization cannot fail");
    out.push('\n');
    out
}

fn render_human(analysis: &Analysis) -> String {
    let mut out = String::new();
    out.push_str("=== Semantic Version Analysis v2 ===\n");
    out.push_str(&format!(
        "Analyzing changes: {} -> {}\n",
        analysis.base_ref, analysis.target_ref
    ));
    out.push_str(&format!("\nCurrent version: {}\n", analysis.current_version));
    out.push_str(&format!("Total bonus points: {}\n", analysis.total_bonus));
    out.push_str(&format!(
        "\nSuggested bump: {}\n",
        analysis.suggestion.as_str().to_uppercase()
    ));
    if let Some(ref next) = analysis.next_version {
        out.push_str(&format!("Next version: {next}\n"));
    }
    out.push_str(&format!("\nSUGGESTION={}\n", analysis.suggestion));
    out
}
