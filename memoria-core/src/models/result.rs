use serde::{Deserialize, Serialize};

use super::confidence_label::ConfidenceLabel;
use super::outcome::Outcome;
use super::tier::Tier;

/// Per-source rank provenance plus every intermediate score a candidate
/// accrued on its way through the pipeline (§6 `search` result `score_summary`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub final_score: f64,
    pub embedding_similarity: Option<f64>,
    pub learned_score: Option<f64>,
    pub dense_similarity: Option<f64>,
    pub text_similarity: Option<f64>,
    pub rrf_score: Option<f64>,
    pub ce_score: Option<f64>,
    pub quality_score: Option<f64>,
    pub entity_boost: Option<f64>,
    pub embedding_weight: Option<f64>,
    pub learned_weight: Option<f64>,
    pub vector_rank: Option<usize>,
    pub lexical_rank: Option<usize>,
    pub ce_rank: Option<usize>,
    pub uses: u64,
    pub wilson_score: f64,
    pub success_rate: f64,
    pub last_outcome: Option<Outcome>,
    pub age_seconds: i64,
}

/// One citation for an item that contributed to the assembled context (§4.6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub memory_id: String,
    pub tier: Tier,
    pub preview: String,
}

/// A single ranked retrieval result (§6 `search`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResult {
    pub position: usize,
    pub memory_id: String,
    pub tier: Tier,
    pub content: String,
    pub preview: Option<String>,
    pub score_summary: ScoreSummary,
    pub citations: Vec<Citation>,
}

/// Per-stage timing and fallback bookkeeping threaded through the pipeline
/// and surfaced verbatim to the Facade caller (§4.5, §6 `debug`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineDebug {
    pub stage_timings_ms: std::collections::BTreeMap<String, u64>,
    pub fallbacks_used: Vec<String>,
    pub errors: Vec<String>,
    pub confidence: Option<ConfidenceLabel>,
}

impl PipelineDebug {
    pub fn record_stage(&mut self, stage: &str, elapsed_ms: u64) {
        self.stage_timings_ms.insert(stage.to_string(), elapsed_ms);
    }

    pub fn fallback(&mut self, name: &str) {
        self.fallbacks_used.push(name.to_string());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

/// Output of `prefetchContext` (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefetchResult {
    pub injection_text: String,
    pub confidence: ConfidenceLabel,
    pub debug: PipelineDebug,
}

/// Output of `search` (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub results: Vec<RankedResult>,
    pub debug: PipelineDebug,
}

/// Sort order for `search` (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    Relevance,
    Recency,
    Score,
}
