//! Per-candidate state threaded through stages 4-10 of the pipeline.

use memoria_core::models::{MemoryItem, ScoreSummary};

/// One candidate memory on its way through fusion, weighting, and quality
/// enforcement. Built from the fused id set, then enriched as each later
/// stage runs.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub item: MemoryItem,
    pub rrf_score: f64,
    pub vector_similarity: Option<f64>,
    pub vector_rank: Option<usize>,
    pub lexical_rank: Option<usize>,
    pub ce_rank: Option<usize>,
    pub ce_score: Option<f64>,
    /// Final ordering score, set by stage 7/8.
    pub final_score: f64,
}

impl Candidate {
    pub fn score_summary(&self, embedding_weight: f64, learned_weight: f64, learned_score: f64) -> ScoreSummary {
        ScoreSummary {
            final_score: self.final_score,
            embedding_similarity: self.vector_similarity,
            learned_score: Some(learned_score),
            dense_similarity: self.vector_similarity,
            text_similarity: None,
            rrf_score: Some(self.rrf_score),
            ce_score: self.ce_score,
            quality_score: Some(self.item.quality.quality_score()),
            entity_boost: None,
            embedding_weight: Some(embedding_weight),
            learned_weight: Some(learned_weight),
            vector_rank: self.vector_rank,
            lexical_rank: self.lexical_rank,
            ce_rank: self.ce_rank,
            uses: self.item.stats.uses,
            wilson_score: self.item.stats.wilson_score,
            success_rate: self.item.stats.success_rate,
            last_outcome: None,
            age_seconds: (chrono::Utc::now() - self.item.created_at).num_seconds().max(0),
        }
    }
}
