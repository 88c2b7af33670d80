//! Version bump arithmetic.
//!
//! The delta model is churn-sensitive but bounded: a base delta grows with
//! the line churn, the bonus is scaled by a capped multiplier quantised to
//! two decimals, and the combined delta is added to the patch slot with
//! carries into minor and major at 1000. Lower segments are deliberately
//! not reset on minor or major bumps — repeated bumps produce strictly
//! increasing version strings.

use tracing::debug;

use crate::config::ConfigValues;

/// Modulus for the patch and minor segments during carry propagation.
pub const MAIN_MOD: i64 = 1000;

/// The bump kind the arithmetic operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    /// Patch-level bump.
    Patch,
    /// Minor-level bump.
    Minor,
    /// Major-level bump.
    Major,
}

impl std::fmt::Display for BumpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Patch => write!(f, "patch"),
            Self::Minor => write!(f, "minor"),
            Self::Major => write!(f, "major"),
        }
    }
}

/// `round(numerator / divisor)` with half away from zero, in integers.
const fn rounded_div(numerator: i64, divisor: i64) -> i64 {
    (numerator + divisor / 2) / divisor
}

/// Base delta for a bump kind at the given churn.
///
/// Minor and major slopes derive from the configured divisors at fixed
/// ratios (divisor/5 and divisor/10 — both 100 at the defaults). Divisors
/// not divisible by the ratio shift the effective slope; the behavior is
/// kept for parity with the established config semantics.
pub fn base_delta(kind: BumpKind, loc: i64, cfg: &ConfigValues) -> i64 {
    let delta = match kind {
        BumpKind::Patch => cfg.base_delta_patch + rounded_div(loc, cfg.loc_divisor_patch.max(1)),
        BumpKind::Minor => {
            let divisor = (cfg.loc_divisor_minor / 5).max(1);
            cfg.base_delta_minor + rounded_div(loc, divisor)
        }
        BumpKind::Major => {
            let divisor = (cfg.loc_divisor_major / 10).max(1);
            cfg.base_delta_major + rounded_div(loc, divisor)
        }
    };
    delta.max(1)
}

/// Churn multiplier for a bump kind, quantised to two decimals and returned
/// as hundredths (`2.00` is `200`).
pub fn multiplier_centi(kind: BumpKind, loc: i64, cfg: &ConfigValues) -> i64 {
    let divisor = match kind {
        BumpKind::Patch => cfg.loc_divisor_patch,
        BumpKind::Minor => cfg.loc_divisor_minor,
        BumpKind::Major => cfg.loc_divisor_major,
    };
    let mut multiplier = if divisor > 0 {
        1.0 + loc as f64 / divisor as f64
    } else {
        1.0
    };
    if multiplier > cfg.bonus_multiplier_cap {
        multiplier = cfg.bonus_multiplier_cap;
    }
    (multiplier * 100.0 + 0.5).floor() as i64
}

/// Combined delta: base plus the multiplier-scaled bonus, at least 1.
pub fn total_delta(kind: BumpKind, loc: i64, bonus: i64, cfg: &ConfigValues) -> i64 {
    let centi = multiplier_centi(kind, loc, cfg);
    let scaled_bonus = rounded_div(bonus * centi, 100);
    (base_delta(kind, loc, cfg) + scaled_bonus).max(1)
}

/// Parse a dotted triplet leniently: missing or malformed segments read as
/// zero, mirroring the forgiving treatment of hand-edited `VERSION` files.
fn parse_triplet(version: &str) -> (i64, i64, i64) {
    let mut parts = version.split('.');
    let mut next = || {
        parts
            .next()
            .and_then(|segment| segment.trim().parse::<i64>().ok())
            .unwrap_or(0)
    };
    (next(), next(), next())
}

/// Compute the next version string.
///
/// The same delta lands in the patch slot for every kind; only the base
/// delta differs. Carries propagate at [`MAIN_MOD`]. A `0.0.0` current
/// version short-circuits to the canonical first release for the kind.
pub fn bump_version(
    current: &str,
    kind: BumpKind,
    loc: i64,
    bonus: i64,
    cfg: &ConfigValues,
    main_mod: i64,
) -> String {
    let (major, minor, patch) = parse_triplet(current);

    if major == 0 && minor == 0 && patch == 0 {
        return match kind {
            BumpKind::Major => "1.0.0".to_string(),
            BumpKind::Minor => "0.1.0".to_string(),
            BumpKind::Patch => "0.0.1".to_string(),
        };
    }

    let delta = total_delta(kind, loc, bonus, cfg);

    let patch_sum = patch + delta;
    let new_patch = patch_sum % main_mod;
    let minor_carry = patch_sum / main_mod;
    let minor_sum = minor + minor_carry;
    let new_minor = minor_sum % main_mod;
    let major_carry = minor_sum / main_mod;
    let new_major = major + major_carry;

    let next = format!("{new_major}.{new_minor}.{new_patch}");
    debug!(%current, %kind, loc, bonus, delta, %next, "version bumped");
    next
}
