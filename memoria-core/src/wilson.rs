//! Wilson-score reputation math (§4.11).
//!
//! Pure functions only — no I/O, no mutation. Kept free of `MemoryItem` so
//! it can be property-tested in isolation (§8 invariant 1) and reused by
//! both `Stats::recompute` and the lifecycle crate's promotion predicate.

use crate::constants::{DEFAULT_INITIAL_WILSON_SCORE, WILSON_Z};
use crate::models::Tier;

/// Lower bound of the Wilson confidence interval for `worked` successes out
/// of `worked + failed` trials, at the given z-value.
///
/// Returns the configured initial score when there is no evidence yet
/// (`n == 0`), matching the "new item" row of the dynamic weighting table.
pub fn wilson_score_z(worked: u64, failed: u64, z: f64) -> f64 {
    let n = (worked + failed) as f64;
    if n <= 0.0 {
        return DEFAULT_INITIAL_WILSON_SCORE;
    }
    let p_hat = worked as f64 / n;
    let z2 = z * z;
    let numerator =
        p_hat + z2 / (2.0 * n) - z * ((p_hat * (1.0 - p_hat) + z2 / (4.0 * n)) / n).sqrt();
    let denominator = 1.0 + z2 / n;
    (numerator / denominator).clamp(0.0, 1.0)
}

/// Wilson score at the standard 95% confidence z-value (§4.11 default).
pub fn wilson_score(worked: u64, failed: u64) -> f64 {
    wilson_score_z(worked, failed, WILSON_Z)
}

/// Per-tier promotion thresholds consulted by `is_promotion_eligible` and by
/// the lifecycle crate's `Promoter` (§4.8, §4.11).
#[derive(Debug, Clone, Copy)]
pub struct PromotionThreshold {
    pub min_score: f64,
    pub min_uses: u64,
    pub min_age_days: i64,
}

/// Thresholds for promoting *into* the given tier. `Working` has no
/// incoming threshold — it is the entry tier for new items.
pub fn promotion_threshold_for(target: Tier) -> Option<PromotionThreshold> {
    match target {
        Tier::History => Some(PromotionThreshold {
            min_score: 0.7,
            min_uses: 2,
            min_age_days: 0,
        }),
        Tier::Patterns => Some(PromotionThreshold {
            min_score: 0.9,
            min_uses: 3,
            min_age_days: 0,
        }),
        _ => None,
    }
}

/// Promotion eligibility predicate (§4.11): `wilson_score >= tier.min_score
/// AND uses >= tier.min_uses AND (now - created_at) >= tier.min_age`.
pub fn is_eligible(
    wilson_score: f64,
    uses: u64,
    age_days: i64,
    threshold: PromotionThreshold,
) -> bool {
    wilson_score >= threshold.min_score
        && uses >= threshold.min_uses
        && age_days >= threshold.min_age_days
}
