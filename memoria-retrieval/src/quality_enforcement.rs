//! Stage 8 (§4.5): three-stage quality enforcement applied only to
//! `memory_bank` items, so a strong cross-encoder signal cannot wash out a
//! curated item's hand-set quality.

/// `(a)` distance boost, `(b)` similarity conversion, `(c)` CE-applied
/// quality multiplier.
pub fn enforce(raw_distance: f64, quality_score: f64, ce_applied: bool, ce_multiplier_max: f64) -> f64 {
    let adjusted_distance = raw_distance * (1.0 - quality_score * 0.8).max(0.2);
    let similarity = 1.0 / (1.0 + adjusted_distance);
    let multiplier = if ce_applied {
        (1.0 + quality_score).min(ce_multiplier_max)
    } else {
        1.0
    };
    similarity * multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_yields_max_similarity_before_multiplier() {
        let score = enforce(0.0, 0.5, false, 2.0);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn higher_quality_shrinks_adjusted_distance() {
        let low_quality = enforce(1.0, 0.0, false, 2.0);
        let high_quality = enforce(1.0, 1.0, false, 2.0);
        assert!(high_quality > low_quality);
    }

    #[test]
    fn ce_multiplier_is_capped() {
        let score = enforce(0.0, 5.0, true, 2.0);
        // similarity is 1.0 here (zero distance), so the result is exactly
        // the capped multiplier.
        assert!((score - 2.0).abs() < 1e-9);
    }

    #[test]
    fn multiplier_is_one_when_ce_skipped() {
        let with_ce = enforce(0.5, 0.8, true, 2.0);
        let without_ce = enforce(0.5, 0.8, false, 2.0);
        assert!(with_ce >= without_ce);
    }
}
