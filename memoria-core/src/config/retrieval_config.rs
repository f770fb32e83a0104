use serde::{Deserialize, Serialize};

use crate::constants;

/// One band of the RRF dynamic-`k` decision table (§4.5 stage 5, §9: "express
/// as a small decision table ... so new bands are config, not code"). Bands
/// are tried in order; the first whose `max_query_len` is `None` or exceeds
/// the query length wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RrfKBand {
    pub max_query_len: Option<usize>,
    pub k: f64,
}

/// Retrieval pipeline tuning (§4.5, §6 knobs).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// How many candidates to fetch per channel relative to the requested
    /// `top_k`, before fusion and reranking narrow the set back down.
    pub candidate_fetch_multiplier: usize,
    /// Number of fused candidates handed to the cross-encoder reranker.
    pub rerank_k: usize,
    /// RRF `k` decision table, evaluated against query char length.
    pub rrf_k_bands: Vec<RrfKBand>,
    /// Subtracted from the matched band's `k` when the query is judged
    /// "specific" (identity lookup, quoted substring, demonstrative).
    pub rrf_k_specific_penalty: f64,
    /// Floor applied after the specific-query penalty.
    pub rrf_k_floor: f64,
    /// Ceiling on how much the cross-encoder score may multiply the fused
    /// score by, bounding a single signal's influence on final rank.
    pub ce_multiplier_max: f64,
    /// Wilson-score floor for a `memory_bank` item to surface without a
    /// strong query match (§4.5 stage 8).
    pub high_quality_threshold: f64,
    /// Default number of results returned by `search` when unspecified.
    pub default_top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            candidate_fetch_multiplier: constants::DEFAULT_CANDIDATE_FETCH_MULTIPLIER,
            rerank_k: constants::DEFAULT_RERANK_K,
            rrf_k_bands: vec![
                RrfKBand { max_query_len: Some(20), k: 80.0 },
                RrfKBand { max_query_len: Some(50), k: 60.0 },
                RrfKBand { max_query_len: None, k: 50.0 },
            ],
            rrf_k_specific_penalty: 20.0,
            rrf_k_floor: 30.0,
            ce_multiplier_max: constants::DEFAULT_CE_MULTIPLIER_MAX,
            high_quality_threshold: constants::HIGH_QUALITY_THRESHOLD,
            default_top_k: 10,
        }
    }
}

impl RetrievalConfig {
    /// Resolve the dynamic RRF `k` for a query of the given length (§4.5
    /// stage 5).
    pub fn rrf_k_for(&self, query_len: usize, is_specific: bool) -> f64 {
        let band_k = self
            .rrf_k_bands
            .iter()
            .find(|b| b.max_query_len.map(|max| query_len < max).unwrap_or(true))
            .map(|b| b.k)
            .unwrap_or(50.0);
        if is_specific {
            (band_k - self.rrf_k_specific_penalty).max(self.rrf_k_floor)
        } else {
            band_k
        }
    }
}
