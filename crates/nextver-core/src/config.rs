//! Scoring weights and thresholds, loaded from the analyzed repository.
//!
//! The config lives at `dev-config/versioning.yml` under the repo root.
//! Two layouts are accepted for the `bonuses` section, and the nested one
//! wins when both are present:
//!
//! ```yaml
//! # nested (current)
//! bonuses:
//!   breaking_changes:
//!     cli_breaking: 4
//!     api_breaking: 5
//!     removed_option: 3
//!   cli_interface:
//!     cli_changes: 2
//!     manual_cli: 1
//!   additions:
//!     new_source: 1
//!     new_test: 1
//!     new_doc: 1
//!   security:
//!     keyword: 5
//!
//! # flat (legacy)
//! bonuses:
//!   breaking_cli: 4
//!   security: 5
//! ```
//!
//! Missing files and missing keys keep the built-in defaults; unknown keys
//! are ignored. Values may be integers or decimals (decimals are truncated
//! for integer weights).

use std::collections::BTreeMap;

use camino::Utf8Path;
use figment::Figment;
use figment::providers::{Format, Yaml};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};

/// Location of the versioning config, relative to the repository root.
pub const CONFIG_RELATIVE_PATH: &str = "dev-config/versioning.yml";

/// Weights, thresholds, and bump-arithmetic parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValues {
    /// `total_bonus` at or above this suggests a major bump.
    pub major_bonus_threshold: i64,
    /// `total_bonus` at or above this suggests a minor bump.
    pub minor_bonus_threshold: i64,
    /// `total_bonus` strictly above this suggests a patch bump.
    pub patch_bonus_threshold: i64,

    /// Weight for a breaking CLI change signal.
    pub bonus_breaking_cli: i64,
    /// Weight for an API-breaking signal (also used for general breaking).
    pub bonus_api_breaking: i64,
    /// Weight applied once when any option removal is detected.
    pub bonus_removed_option: i64,
    /// Weight for any CLI surface change.
    pub bonus_cli_changes: i64,
    /// Weight for manually-maintained (non-structural) CLI changes.
    pub bonus_manual_cli: i64,
    /// Weight when at least one new source file is added.
    pub bonus_new_source: i64,
    /// Weight when at least one new test file is added.
    pub bonus_new_test: i64,
    /// Weight when at least one new doc file is added.
    pub bonus_new_doc: i64,
    /// Per-occurrence weight for security signals.
    pub bonus_security: i64,

    /// Upper bound for the churn multiplier.
    pub bonus_multiplier_cap: f64,

    /// Base delta added to the patch slot for a patch bump.
    pub base_delta_patch: i64,
    /// Base delta added to the patch slot for a minor bump.
    pub base_delta_minor: i64,
    /// Base delta added to the patch slot for a major bump.
    pub base_delta_major: i64,

    /// Churn divisor for patch bumps.
    pub loc_divisor_patch: i64,
    /// Churn divisor for minor bumps.
    pub loc_divisor_minor: i64,
    /// Churn divisor for major bumps.
    pub loc_divisor_major: i64,
}

impl Default for ConfigValues {
    fn default() -> Self {
        Self {
            major_bonus_threshold: 8,
            minor_bonus_threshold: 4,
            patch_bonus_threshold: 0,
            bonus_breaking_cli: 4,
            bonus_api_breaking: 5,
            bonus_removed_option: 3,
            bonus_cli_changes: 2,
            bonus_manual_cli: 1,
            bonus_new_source: 1,
            bonus_new_test: 1,
            bonus_new_doc: 1,
            bonus_security: 5,
            bonus_multiplier_cap: 5.0,
            base_delta_patch: 1,
            base_delta_minor: 5,
            base_delta_major: 10,
            loc_divisor_patch: 250,
            loc_divisor_minor: 500,
            loc_divisor_major: 1000,
        }
    }
}

/// Raw deserialization target. Every section is optional; `bonuses` entries
/// may be numbers (legacy flat keys) or nested groups.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    thresholds: BTreeMap<String, f64>,
    #[serde(default)]
    bonuses: BTreeMap<String, BonusEntry>,
    #[serde(default)]
    bonus_multiplier_cap: Option<f64>,
    #[serde(default)]
    base_deltas: BTreeMap<String, f64>,
    #[serde(default)]
    loc_divisors: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BonusEntry {
    Value(f64),
    Group(BTreeMap<String, f64>),
}

impl RawConfig {
    /// Look up a bonus weight: nested `bonuses.<group>.<key>` first, then
    /// the flat legacy `bonuses.<flat>`.
    fn bonus(&self, group: &str, key: &str, flat: &str) -> Option<f64> {
        if let Some(BonusEntry::Group(entries)) = self.bonuses.get(group)
            && let Some(value) = entries.get(key)
        {
            return Some(*value);
        }
        match self.bonuses.get(flat) {
            Some(BonusEntry::Value(value)) => Some(*value),
            _ => None,
        }
    }
}

/// Load config values from `<repo_root>/dev-config/versioning.yml`.
///
/// Returns [`ConfigError::NotFound`] when the file is absent or unreadable
/// (including confinement refusals); callers treat that as "use defaults".
pub fn load_config(repo_root: &Utf8Path) -> ConfigResult<ConfigValues> {
    let Some(text) = crate::fs::read_under_root(repo_root, CONFIG_RELATIVE_PATH) else {
        return Err(ConfigError::NotFound);
    };

    let raw: RawConfig = Figment::new()
        .merge(Yaml::string(&text))
        .extract()
        .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;

    Ok(apply(raw))
}

/// Load config values, falling back to defaults on any soft failure.
pub fn load_config_or_default(repo_root: &Utf8Path) -> ConfigValues {
    match load_config(repo_root) {
        Ok(config) => {
            debug!("versioning config loaded");
            config
        }
        Err(ConfigError::NotFound) => {
            debug!("no versioning config, using defaults");
            ConfigValues::default()
        }
        Err(e) => {
            warn!(error = %e, "ignoring unparseable versioning config");
            ConfigValues::default()
        }
    }
}

fn apply(raw: RawConfig) -> ConfigValues {
    let mut cfg = ConfigValues::default();

    let int = |value: f64| value as i64;
    let positive = |value: f64, fallback: i64| {
        let v = int(value);
        if v >= 1 { v } else { fallback }
    };

    if let Some(v) = raw.thresholds.get("major_bonus") {
        cfg.major_bonus_threshold = int(*v);
    }
    if let Some(v) = raw.thresholds.get("minor_bonus") {
        cfg.minor_bonus_threshold = int(*v);
    }
    if let Some(v) = raw.thresholds.get("patch_bonus") {
        cfg.patch_bonus_threshold = int(*v);
    }

    if let Some(v) = raw.bonus("breaking_changes", "cli_breaking", "breaking_cli") {
        cfg.bonus_breaking_cli = int(v);
    }
    if let Some(v) = raw.bonus("breaking_changes", "api_breaking", "api_breaking") {
        cfg.bonus_api_breaking = int(v);
    }
    if let Some(v) = raw.bonus("breaking_changes", "removed_option", "removed_option") {
        cfg.bonus_removed_option = int(v);
    }
    if let Some(v) = raw.bonus("cli_interface", "cli_changes", "cli_changes") {
        cfg.bonus_cli_changes = int(v);
    }
    if let Some(v) = raw.bonus("cli_interface", "manual_cli", "manual_cli") {
        cfg.bonus_manual_cli = int(v);
    }
    if let Some(v) = raw.bonus("additions", "new_source", "new_source") {
        cfg.bonus_new_source = int(v);
    }
    if let Some(v) = raw.bonus("additions", "new_test", "new_test") {
        cfg.bonus_new_test = int(v);
    }
    if let Some(v) = raw.bonus("additions", "new_doc", "new_doc") {
        cfg.bonus_new_doc = int(v);
    }
    if let Some(v) = raw.bonus("security", "keyword", "security") {
        cfg.bonus_security = int(v);
    }

    if let Some(cap) = raw.bonus_multiplier_cap {
        cfg.bonus_multiplier_cap = if cap >= 1.0 { cap } else { 1.0 };
    }

    if let Some(v) = raw.base_deltas.get("patch") {
        cfg.base_delta_patch = positive(*v, cfg.base_delta_patch);
    }
    if let Some(v) = raw.base_deltas.get("minor") {
        cfg.base_delta_minor = positive(*v, cfg.base_delta_minor);
    }
    if let Some(v) = raw.base_deltas.get("major") {
        cfg.base_delta_major = positive(*v, cfg.base_delta_major);
    }

    if let Some(v) = raw.loc_divisors.get("patch") {
        cfg.loc_divisor_patch = positive(*v, cfg.loc_divisor_patch);
    }
    if let Some(v) = raw.loc_divisors.get("minor") {
        cfg.loc_divisor_minor = positive(*v, cfg.loc_divisor_minor);
    }
    if let Some(v) = raw.loc_divisors.get("major") {
        cfg.loc_divisor_major = positive(*v, cfg.loc_divisor_major);
    }

    cfg
}
