//! Test-only engine construction wiring deterministic fakes in place of the
//! HTTP-backed providers `MemoriaEngine::build` uses in production, the same
//! way `memoria-retrieval`'s pipeline tests swap in a `ToyEmbedder` rather
//! than reaching the network.

#![cfg(test)]

use std::sync::Arc;

use dashmap::DashMap;

use memoria_core::config::EngineConfig;
use memoria_core::errors::{CortexError, CortexResult};
use memoria_core::models::Deadline;
use memoria_core::traits::{IEmbedder, ILexicalIndex, IReranker, ISummarizer, IVectorIndex};
use memoria_assembler::ContextAssembler;
use memoria_consistency::{ConsistencyChecker, Reindexer};
use memoria_lexical::BmInMemoryIndex;
use memoria_lifecycle::{ItemLocks, OutcomeRecorder, Promoter};
use memoria_retrieval::RetrievalPipeline;
use memoria_storage::StorageEngine;
use memoria_vector::InMemoryVectorIndex;

use crate::engine::MemoriaEngine;

const VOCAB: &[&str] = &["retry", "policy", "timeout", "deploy", "invoice", "rust"];

struct ToyEmbedder;

impl IEmbedder for ToyEmbedder {
    fn embed(&self, text: &str, _deadline: Deadline) -> CortexResult<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(VOCAB.iter().map(|w| if lower.contains(w) { 1.0 } else { 0.0 }).collect())
    }

    fn embed_batch(&self, texts: &[String], deadline: Deadline) -> CortexResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t, deadline)).collect()
    }

    fn dimensions(&self) -> usize {
        VOCAB.len()
    }

    fn model_name(&self) -> &str {
        "toy"
    }
}

struct FailingReranker;

impl IReranker for FailingReranker {
    fn rerank(&self, _query: &str, _candidates: &[String], _deadline: Deadline) -> CortexResult<Vec<f64>> {
        Err(CortexError::Unavailable("no reranker wired in this test".into()))
    }

    fn model_name(&self) -> &str {
        "none"
    }
}

struct FailingSummarizer;

impl ISummarizer for FailingSummarizer {
    fn summarize(&self, _text: &str, _max_chars: usize, _deadline: Deadline) -> CortexResult<String> {
        Err(CortexError::Unavailable("no summarizer wired in this test".into()))
    }
}

/// A fully wired `MemoriaEngine` backed by an in-memory store and
/// deterministic fakes instead of real HTTP providers.
pub(crate) fn test_engine() -> MemoriaEngine {
    let config = EngineConfig::default();
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let vector_index = Arc::new(InMemoryVectorIndex::new());
    vector_index.ensure_schema(VOCAB.len()).unwrap();
    let lexical_index = Arc::new(BmInMemoryIndex::default());

    let primary: Arc<dyn IEmbedder> = Arc::new(ToyEmbedder);
    let embedder = Arc::new(memoria_embeddings::EmbeddingEngine::new(primary, &config.embeddings));
    let reranker: Arc<dyn IReranker> = Arc::new(FailingReranker);
    let summarizer: Arc<dyn ISummarizer> = Arc::new(FailingSummarizer);

    let retrieval = RetrievalPipeline::new(
        store.clone(),
        vector_index.clone() as Arc<dyn IVectorIndex>,
        lexical_index.clone() as Arc<dyn ILexicalIndex>,
        embedder.clone() as Arc<dyn IEmbedder>,
        reranker,
        config.retrieval.clone(),
        config.timeouts.clone(),
    );

    let locks = Arc::new(ItemLocks::new());
    let outcome_recorder = OutcomeRecorder::new(store.clone(), locks.clone());
    let promoter = Promoter::new(
        store.clone(),
        vector_index.clone() as Arc<dyn IVectorIndex>,
        lexical_index.clone() as Arc<dyn ILexicalIndex>,
        locks.clone(),
        config.lifecycle.clone(),
    );
    let consistency_checker = ConsistencyChecker::new(
        store.clone(),
        vector_index.clone() as Arc<dyn IVectorIndex>,
        lexical_index.clone() as Arc<dyn ILexicalIndex>,
        embedder.clone() as Arc<dyn IEmbedder>,
        config.consistency.clone(),
    );
    let reindexer = Reindexer::new(
        store.clone(),
        vector_index.clone() as Arc<dyn IVectorIndex>,
        embedder.clone() as Arc<dyn IEmbedder>,
    );

    MemoriaEngine {
        store,
        vector_index,
        lexical_index,
        embedder,
        retrieval,
        summarizer,
        locks,
        outcome_recorder,
        promoter,
        consistency_checker,
        reindexer,
        assembler: ContextAssembler::new(),
        config,
        message_counts: DashMap::new(),
    }
}
