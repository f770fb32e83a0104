//! `RetrievalPipeline`: orchestrates the twelve stages of §4.5 against
//! whichever `RecordStore`/`VectorIndex`/`LexicalIndex`/`Embedder`/`Reranker`
//! the caller wires in.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use memoria_core::config::{CircuitBreakerConfig, RetrievalConfig, TimeoutConfig};
use memoria_core::errors::CortexResult;
use memoria_core::models::{
    ConfidenceLabel, Deadline, MemoryItem, PipelineDebug, RankedResult, SearchResult, Tier,
};
use memoria_core::traits::{IEmbedder, ILexicalIndex, IRecordStore, IReranker, IVectorIndex};
use memoria_reliability::CircuitBreaker;

use crate::candidate::Candidate;
use crate::confidence;
use crate::entity_prefilter;
use crate::query_understanding;
use crate::quality_enforcement;
use crate::rrf;
use crate::weighting;

/// Inputs to `RetrievalPipeline::retrieve` (§4.5's `prefetchContext`/`search`
/// share this same pipeline; the Facade distinguishes them by what it does
/// with the `SearchResult` afterward).
pub struct RetrievalParams<'a> {
    pub user_id: &'a str,
    pub query: &'a str,
    pub limit: Option<usize>,
    pub deadline: Deadline,
}

pub struct RetrievalPipeline {
    store: Arc<dyn IRecordStore>,
    vector_index: Arc<dyn IVectorIndex>,
    lexical_index: Arc<dyn ILexicalIndex>,
    embedder: Arc<dyn IEmbedder>,
    reranker: Arc<dyn IReranker>,
    vector_breaker: CircuitBreaker,
    lexical_breaker: CircuitBreaker,
    config: RetrievalConfig,
    timeouts: TimeoutConfig,
}

impl RetrievalPipeline {
    pub fn new(
        store: Arc<dyn IRecordStore>,
        vector_index: Arc<dyn IVectorIndex>,
        lexical_index: Arc<dyn ILexicalIndex>,
        embedder: Arc<dyn IEmbedder>,
        reranker: Arc<dyn IReranker>,
        config: RetrievalConfig,
        timeouts: TimeoutConfig,
    ) -> Self {
        Self::with_breakers(
            store,
            vector_index,
            lexical_index,
            embedder,
            reranker,
            CircuitBreaker::new("vector_index", CircuitBreakerConfig::default()),
            CircuitBreaker::new("lexical_index", CircuitBreakerConfig::default()),
            config,
            timeouts,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn with_breakers(
        store: Arc<dyn IRecordStore>,
        vector_index: Arc<dyn IVectorIndex>,
        lexical_index: Arc<dyn ILexicalIndex>,
        embedder: Arc<dyn IEmbedder>,
        reranker: Arc<dyn IReranker>,
        vector_breaker: CircuitBreaker,
        lexical_breaker: CircuitBreaker,
        config: RetrievalConfig,
        timeouts: TimeoutConfig,
    ) -> Self {
        Self {
            store,
            vector_index,
            lexical_index,
            embedder,
            reranker,
            vector_breaker,
            lexical_breaker,
            config,
            timeouts,
        }
    }

    /// Current state of the vector/lexical breakers, named, for health
    /// reporting.
    pub fn breaker_states(&self) -> Vec<(String, String)> {
        vec![
            (self.vector_breaker.name().to_string(), format!("{:?}", self.vector_breaker.state())),
            (self.lexical_breaker.name().to_string(), format!("{:?}", self.lexical_breaker.state())),
        ]
    }

    pub fn retrieve(&self, params: RetrievalParams<'_>) -> CortexResult<SearchResult> {
        let mut debug_info = PipelineDebug::default();

        // Stage 1: query understanding.
        let stage_start = Instant::now();
        let language = query_understanding::detect_language(params.query);
        let is_specific = query_understanding::is_specific(params.query);
        let limit = params.limit.unwrap_or_else(|| query_understanding::target_limit(params.query));
        debug!(?language, is_specific, limit, "query understood");
        debug_info.record_stage("query_understanding", stage_start.elapsed().as_millis() as u64);

        let fetch_limit = limit * self.config.candidate_fetch_multiplier;

        // Stage 2: entity pre-filter.
        let stage_start = Instant::now();
        let entities = entity_prefilter::extract_entities(params.query);
        let filter_ids = if entities.is_empty() {
            None
        } else {
            match self.vector_index.filter_by_entities(params.user_id, &entities, fetch_limit) {
                Ok(ids) if !ids.is_empty() => Some(ids),
                Ok(_) => None,
                Err(e) => {
                    debug!(error = %e, "entity pre-filter unavailable, skipping");
                    None
                }
            }
        };
        debug_info.record_stage("entity_prefilter", stage_start.elapsed().as_millis() as u64);

        // Stage 3: embed query.
        let stage_start = Instant::now();
        let embed_deadline = params.deadline.child(Duration::from_millis(self.timeouts.embed_ms));
        let query_vector = match self.embedder.embed(params.query, embed_deadline) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!(error = %e, "embedder unavailable, falling back to lexical-only");
                debug_info.fallback("vector_stage");
                None
            }
        };
        let vector_stage_fell_back = query_vector.is_none();
        debug_info.record_stage("embed_query", stage_start.elapsed().as_millis() as u64);

        // Stage 4: parallel candidate generation. Both channels are
        // in-process calls guarded by their own breakers, not network I/O
        // with a deadline of their own; the stage as a whole still respects
        // the overall pipeline deadline via the caller's cancellation.
        let stage_start = Instant::now();
        let filter_ids_ref = filter_ids.as_deref();

        let (vector_hits, lexical_hits) = rayon::join(
            || -> Vec<(String, f64)> {
                let Some(vector) = query_vector.as_ref() else {
                    return Vec::new();
                };
                let vector_index = &self.vector_index;
                match self.vector_breaker.call(|| {
                    vector_index.search(params.user_id, vector, fetch_limit, filter_ids_ref)
                }) {
                    Ok(hits) => hits,
                    Err(e) => {
                        debug!(error = %e, "vector search unavailable");
                        Vec::new()
                    }
                }
            },
            || -> Vec<(String, f64)> {
                let lexical_index = &self.lexical_index;
                match self
                    .lexical_breaker
                    .call(|| lexical_index.score(params.user_id, params.query, fetch_limit))
                {
                    Ok(hits) => hits,
                    Err(e) => {
                        debug!(error = %e, "lexical search unavailable");
                        Vec::new()
                    }
                }
            },
        );
        debug_info.record_stage("candidate_generation", stage_start.elapsed().as_millis() as u64);

        let vector_ids: Vec<String> = vector_hits.iter().map(|(id, _)| id.clone()).collect();
        let lexical_ids: Vec<String> = lexical_hits.iter().map(|(id, _)| id.clone()).collect();
        let vector_similarity: HashMap<String, f64> = vector_hits.into_iter().collect();

        // Stage 5: RRF fusion.
        let stage_start = Instant::now();
        let k = self.config.rrf_k_for(params.query.chars().count(), is_specific);
        let mut fused = rrf::fuse(&[vector_ids.clone(), lexical_ids.clone()], k);
        debug_info.record_stage("rrf_fusion", stage_start.elapsed().as_millis() as u64);

        if fused.is_empty() {
            debug_info.confidence = Some(ConfidenceLabel::Low);
            return Ok(SearchResult { results: Vec::new(), debug: debug_info });
        }

        // Stage 6: optional cross-encoder rerank.
        let stage_start = Instant::now();
        let mut ce_applied = false;
        let mut ce_scores: HashMap<String, (usize, f64)> = HashMap::new();
        if fused.len() >= 2 {
            let top_ids: Vec<String> = fused.iter().take(self.config.rerank_k).map(|f| f.memory_id.clone()).collect();
            match self.rerank_candidates(params.user_id, params.query, &top_ids, &params.deadline) {
                Ok(ce_ids_scores) => {
                    let ce_ids: Vec<String> = ce_ids_scores.iter().map(|(id, _)| id.clone()).collect();
                    for (rank, (id, score)) in ce_ids_scores.into_iter().enumerate() {
                        ce_scores.insert(id, (rank + 1, score));
                    }
                    fused = rrf::fuse(&[vector_ids, lexical_ids, ce_ids], k);
                    ce_applied = true;
                }
                Err(e) => {
                    debug!(error = %e, "reranker fallback, keeping prior fusion");
                    debug_info.fallback("reranker");
                }
            }
        }
        debug_info.record_stage("rerank", stage_start.elapsed().as_millis() as u64);

        // Fetch the full items for every fused candidate in one bulk call.
        let ids: Vec<String> = fused.iter().map(|f| f.memory_id.clone()).collect();
        let items = self.store.get_bulk(params.user_id, &ids)?;
        let mut items_by_id: HashMap<String, MemoryItem> =
            items.into_iter().map(|item| (item.memory_id.clone(), item)).collect();

        // Stage 7 + 8: per-item weighting and memory_bank quality enforcement.
        let stage_start = Instant::now();
        let mut candidates: Vec<(Candidate, f64, f64, f64)> = Vec::new();
        for f in &fused {
            let Some(item) = items_by_id.remove(&f.memory_id) else {
                continue;
            };
            if !item.is_active() {
                continue;
            }
            let quality_score = item.quality.quality_score();
            let wilson = item.stats.wilson_score;
            let uses = item.stats.uses;
            let tier = item.tier;

            let (embedding_weight, learned_weight) =
                weighting::weights_for(tier, uses, wilson, quality_score, self.config.high_quality_threshold);
            let learned_score = weighting::learned_score_for(tier, wilson, quality_score);

            let vector_similarity_value = vector_similarity.get(&f.memory_id).copied();
            let embedding_similarity = vector_similarity_value.unwrap_or(f.rrf_score);

            let mut final_score = embedding_weight * embedding_similarity + learned_weight * learned_score;

            if tier == Tier::MemoryBank {
                let raw_distance = 1.0 - embedding_similarity.clamp(0.0, 1.0);
                final_score = quality_enforcement::enforce(raw_distance, quality_score, ce_applied, self.config.ce_multiplier_max);
            }

            let (ce_rank, ce_score) = match ce_scores.get(&f.memory_id) {
                Some((rank, score)) => (Some(*rank), Some(*score)),
                None => (None, None),
            };

            let candidate = Candidate {
                item,
                rrf_score: f.rrf_score,
                vector_similarity: vector_similarity_value,
                vector_rank: f.source_ranks.first().copied().flatten(),
                lexical_rank: f.source_ranks.get(1).copied().flatten(),
                ce_rank,
                ce_score,
                final_score,
            };
            candidates.push((candidate, embedding_weight, learned_weight, learned_score));
        }
        candidates.sort_by(|a, b| b.0.final_score.partial_cmp(&a.0.final_score).unwrap_or(std::cmp::Ordering::Equal));
        debug_info.record_stage("weighting_and_quality", stage_start.elapsed().as_millis() as u64);

        // Stage 9: ghost filter.
        let stage_start = Instant::now();
        let ghosts: HashSet<String> = self.store.ghost_ids(params.user_id)?.into_iter().collect();
        candidates.retain(|(c, ..)| !ghosts.contains(&c.item.memory_id));
        debug_info.record_stage("ghost_filter", stage_start.elapsed().as_millis() as u64);

        // Stage 10: truncate. Candidates are already deduplicated by
        // construction (one entry per `memory_id` from the fused map).
        candidates.truncate(limit);

        // Stage 11: confidence label.
        let top_score = candidates.first().map(|(c, ..)| c.final_score).unwrap_or(0.0);
        let label = confidence::label(top_score, candidates.len());
        let reranker_used_all_survived = ce_applied && candidates.len() >= self.config.rerank_k.min(fused.len());
        let label = confidence::apply_overrides(label, reranker_used_all_survived, vector_stage_fell_back);
        debug_info.confidence = Some(label);

        // Stage 12: handoff — assemble ranked results for the caller
        // (context assembly into injection text happens one layer up).
        let results: Vec<RankedResult> = candidates
            .into_iter()
            .enumerate()
            .map(|(i, (candidate, embedding_weight, learned_weight, learned_score))| {
                let score_summary = candidate.score_summary(embedding_weight, learned_weight, learned_score);
                let preview = Some(candidate.item.text.chars().take(160).collect());
                RankedResult {
                    position: i + 1,
                    memory_id: candidate.item.memory_id.clone(),
                    tier: candidate.item.tier,
                    content: candidate.item.text.clone(),
                    preview,
                    score_summary,
                    citations: Vec::new(),
                }
            })
            .collect();

        warn_if_empty(&results, params.query);

        Ok(SearchResult { results, debug: debug_info })
    }

    /// Rerank `ids` (fetched fresh from the store) against `query`, returning
    /// `(memory_id, ce_score)` pairs sorted descending by score.
    fn rerank_candidates(
        &self,
        user_id: &str,
        query: &str,
        ids: &[String],
        deadline: &Deadline,
    ) -> CortexResult<Vec<(String, f64)>> {
        let items = self.store.get_bulk(user_id, ids)?;
        let texts_by_id: HashMap<String, String> =
            items.into_iter().map(|item| (item.memory_id, item.text)).collect();
        let ordered_ids: Vec<String> = ids.iter().filter(|id| texts_by_id.contains_key(*id)).cloned().collect();
        let passages: Vec<String> = ordered_ids.iter().map(|id| texts_by_id[id].clone()).collect();

        let rerank_deadline = deadline.child(Duration::from_millis(self.timeouts.rerank_ms));
        let scores = self.reranker.rerank(query, &passages, rerank_deadline)?;

        let mut scored: Vec<(String, f64)> = ordered_ids.into_iter().zip(scores).collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Ok(scored)
    }
}

fn warn_if_empty(results: &[RankedResult], query: &str) {
    if results.is_empty() {
        debug!(query, "retrieval produced no results");
    }
}
