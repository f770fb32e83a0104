use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use memoria_core::config::{RetrievalConfig, TimeoutConfig};
use memoria_core::errors::{CortexError, CortexResult};
use memoria_core::models::{Deadline, MemoryItem, Quality, Source, Status, Tier};
use memoria_core::traits::{IEmbedder, IRecordStore, IReranker};
use memoria_lexical::BmInMemoryIndex;
use memoria_retrieval::{RetrievalParams, RetrievalPipeline};
use memoria_storage::StorageEngine;
use memoria_vector::InMemoryVectorIndex;

/// An embedder that turns text into a deterministic one-hot-ish vector over
/// a tiny fixed vocabulary, so cosine similarity tracks word overlap.
struct ToyEmbedder;

const VOCAB: &[&str] = &["retry", "policy", "timeout", "deploy", "invoice", "rust"];

fn toy_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    VOCAB
        .iter()
        .map(|w| if lower.contains(w) { 1.0 } else { 0.0 })
        .collect()
}

impl IEmbedder for ToyEmbedder {
    fn embed(&self, text: &str, _deadline: Deadline) -> CortexResult<Vec<f32>> {
        Ok(toy_vector(text))
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

fn seed_item(store: &StorageEngine, user_id: &str, id: &str, text: &str, tier: Tier, uses: u64) {
    let now = Utc::now();
    let mut item = MemoryItem::new(id, user_id, tier, text, Source::User { conversation_id: "c1".into(), message_id: None }, now);
    item.quality = Quality::new(0.8, 0.8);
    for _ in 0..uses {
        item.apply_outcome(memoria_core::models::Outcome::Worked, now);
    }
    store.put(&item).unwrap();
}

fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(5))
}

#[test]
fn retrieves_and_ranks_by_relevance() {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let vector_index = Arc::new(InMemoryVectorIndex::new());
    let lexical_index = Arc::new(BmInMemoryIndex::default());
    let embedder: Arc<dyn IEmbedder> = Arc::new(ToyEmbedder);
    let reranker: Arc<dyn IReranker> = Arc::new(FailingReranker);

    let user_id = "u1";
    seed_item(&store, user_id, "mem-retry", "our retry policy uses exponential backoff", Tier::History, 6);
    seed_item(&store, user_id, "mem-invoice", "the invoice template lives in billing", Tier::History, 0);

    vector_index
        .upsert(user_id, "mem-retry", &toy_vector("retry policy timeout"), Tier::History, Status::Active)
        .unwrap();
    vector_index
        .upsert(user_id, "mem-invoice", &toy_vector("invoice"), Tier::History, Status::Active)
        .unwrap();
    lexical_index.index(user_id, "mem-retry", "our retry policy uses exponential backoff").unwrap();
    lexical_index.index(user_id, "mem-invoice", "the invoice template lives in billing").unwrap();

    let pipeline = RetrievalPipeline::new(
        store.clone(),
        vector_index.clone(),
        lexical_index.clone(),
        embedder,
        reranker,
        RetrievalConfig::default(),
        TimeoutConfig::default(),
    );

    let result = pipeline
        .retrieve(RetrievalParams {
            user_id,
            query: "what is our retry policy",
            limit: None,
            deadline: deadline(),
        })
        .unwrap();

    assert!(!result.results.is_empty());
    assert_eq!(result.results[0].memory_id, "mem-retry");
}

#[test]
fn ghosted_items_never_surface() {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let vector_index = Arc::new(InMemoryVectorIndex::new());
    let lexical_index = Arc::new(BmInMemoryIndex::default());
    let embedder: Arc<dyn IEmbedder> = Arc::new(ToyEmbedder);
    let reranker: Arc<dyn IReranker> = Arc::new(FailingReranker);

    let user_id = "u1";
    seed_item(&store, user_id, "mem-retry", "our retry policy uses exponential backoff", Tier::History, 1);
    vector_index.upsert(user_id, "mem-retry", &toy_vector("retry policy"), Tier::History, Status::Active).unwrap();
    lexical_index.index(user_id, "mem-retry", "our retry policy uses exponential backoff").unwrap();
    store.mark_ghost(user_id, "mem-retry").unwrap();

    let pipeline = RetrievalPipeline::new(
        store.clone(),
        vector_index.clone(),
        lexical_index.clone(),
        embedder,
        reranker,
        RetrievalConfig::default(),
        TimeoutConfig::default(),
    );

    let result = pipeline
        .retrieve(RetrievalParams {
            user_id,
            query: "retry policy",
            limit: None,
            deadline: deadline(),
        })
        .unwrap();

    assert!(result.results.is_empty());
}

#[test]
fn empty_index_yields_low_confidence_and_no_results() {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let vector_index = Arc::new(InMemoryVectorIndex::new());
    let lexical_index = Arc::new(BmInMemoryIndex::default());
    let embedder: Arc<dyn IEmbedder> = Arc::new(ToyEmbedder);
    let reranker: Arc<dyn IReranker> = Arc::new(FailingReranker);

    let pipeline = RetrievalPipeline::new(
        store,
        vector_index,
        lexical_index,
        embedder,
        reranker,
        RetrievalConfig::default(),
        TimeoutConfig::default(),
    );

    let result = pipeline
        .retrieve(RetrievalParams {
            user_id: "nobody",
            query: "anything at all",
            limit: None,
            deadline: deadline(),
        })
        .unwrap();

    assert!(result.results.is_empty());
    assert_eq!(result.debug.confidence, Some(memoria_core::models::ConfidenceLabel::Low));
}
