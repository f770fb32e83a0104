//! Stage 11 (§4.5): confidence labeling from the fused result set, plus the
//! two override rules.

use memoria_core::models::ConfidenceLabel;

/// `high` if the top score is `>= 0.75` and there are `>= 3` results;
/// `medium` if the top score is `>= 0.5`; `low` otherwise.
pub fn label(top_score: f64, num_results: usize) -> ConfidenceLabel {
    if top_score >= 0.75 && num_results >= 3 {
        ConfidenceLabel::High
    } else if top_score >= 0.5 {
        ConfidenceLabel::Medium
    } else {
        ConfidenceLabel::Low
    }
}

/// Apply the override rules: a full-survival reranker pass earns one
/// upgrade; a vector-stage fallback costs one downgrade (floored at `low`).
/// Both conditions may apply in the same request.
pub fn apply_overrides(
    mut label: ConfidenceLabel,
    reranker_used_all_survived: bool,
    vector_stage_fell_back: bool,
) -> ConfidenceLabel {
    if reranker_used_all_survived {
        label = label.upgrade();
    }
    if vector_stage_fell_back {
        label = label.downgrade();
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_requires_score_and_count() {
        assert_eq!(label(0.8, 3), ConfidenceLabel::High);
        assert_eq!(label(0.8, 2), ConfidenceLabel::Medium);
    }

    #[test]
    fn medium_on_moderate_score() {
        assert_eq!(label(0.6, 1), ConfidenceLabel::Medium);
    }

    #[test]
    fn low_on_weak_score() {
        assert_eq!(label(0.2, 10), ConfidenceLabel::Low);
    }

    #[test]
    fn rerank_upgrade_and_vector_downgrade_cancel_out() {
        let labeled = apply_overrides(ConfidenceLabel::Medium, true, true);
        assert_eq!(labeled, ConfidenceLabel::Medium);
    }

    #[test]
    fn downgrade_floors_at_low() {
        let labeled = apply_overrides(ConfidenceLabel::Low, false, true);
        assert_eq!(labeled, ConfidenceLabel::Low);
    }
}
