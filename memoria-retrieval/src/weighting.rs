//! Stage 7 (§4.5): per-item dynamic weighting between the embedding
//! similarity signal and the learned (outcome/quality) signal.

use memoria_core::models::Tier;

/// `(embedding_weight, learned_weight)` for one candidate, decided by a
/// small ordered decision table (§4.5 stage 7). Weights always sum to 1.
pub fn weights_for(tier: Tier, uses: u64, wilson: f64, quality_score: f64, high_quality_threshold: f64) -> (f64, f64) {
    if tier == Tier::Documents {
        return (0.90, 0.10);
    }
    if tier == Tier::MemoryBank {
        return if quality_score >= high_quality_threshold {
            (0.45, 0.55)
        } else {
            (0.60, 0.40)
        };
    }
    if uses >= 5 && wilson >= 0.8 {
        return (0.20, 0.80);
    }
    if uses >= 3 && wilson >= 0.7 {
        return (0.25, 0.75);
    }
    if uses >= 2 && wilson >= 0.5 {
        return (0.35, 0.65);
    }
    if uses >= 2 && wilson < 0.5 {
        return (0.70, 0.30);
    }
    (0.70, 0.30)
}

/// The signal blended with `embedding_weight` — Wilson score for most tiers,
/// quality score for `memory_bank` (§4.5 stage 7).
pub fn learned_score_for(tier: Tier, wilson: f64, quality_score: f64) -> f64 {
    if tier == Tier::MemoryBank {
        quality_score
    } else {
        wilson
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_tier_favors_embedding() {
        assert_eq!(weights_for(Tier::Documents, 0, 0.0, 0.0, 0.8), (0.90, 0.10));
    }

    #[test]
    fn high_quality_memory_bank_favors_learned() {
        assert_eq!(weights_for(Tier::MemoryBank, 0, 0.0, 0.9, 0.8), (0.45, 0.55));
    }

    #[test]
    fn low_quality_memory_bank_still_favors_learned_less() {
        assert_eq!(weights_for(Tier::MemoryBank, 0, 0.0, 0.5, 0.8), (0.60, 0.40));
    }

    #[test]
    fn proven_item_favors_learned_signal() {
        assert_eq!(weights_for(Tier::History, 6, 0.85, 0.0, 0.8), (0.20, 0.80));
    }

    #[test]
    fn unproven_item_favors_embedding() {
        assert_eq!(weights_for(Tier::Working, 0, 0.5, 0.0, 0.8), (0.70, 0.30));
    }

    #[test]
    fn weights_always_sum_to_one() {
        let cases = [
            (Tier::Documents, 0, 0.0, 0.0),
            (Tier::MemoryBank, 0, 0.0, 0.9),
            (Tier::History, 9, 0.9, 0.0),
            (Tier::History, 3, 0.7, 0.0),
            (Tier::History, 2, 0.6, 0.0),
            (Tier::History, 2, 0.1, 0.0),
            (Tier::Working, 0, 0.5, 0.0),
        ];
        for (tier, uses, wilson, quality) in cases {
            let (e, l) = weights_for(tier, uses, wilson, quality, 0.8);
            assert!((e + l - 1.0).abs() < 1e-9);
        }
    }
}
