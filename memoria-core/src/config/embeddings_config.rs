use serde::{Deserialize, Serialize};

/// Embedding/reranker/summarizer cache and batching tuning (§4.2-4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsConfig {
    /// Maximum entries kept in the in-process embedding LRU cache.
    pub embedding_cache_capacity: u64,
    /// Maximum entries kept in the reranker score cache.
    pub rerank_cache_capacity: u64,
    /// Maximum entries kept in the summarizer cache.
    pub summary_cache_capacity: u64,
    /// Maximum number of texts sent to the embedder in a single batch call.
    pub max_embed_batch_size: usize,
    /// Time-to-live applied to every cache entry (embedding, rerank, summary).
    pub cache_ttl_secs: u64,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            embedding_cache_capacity: 10_000,
            rerank_cache_capacity: 5_000,
            summary_cache_capacity: 2_000,
            max_embed_batch_size: 64,
            cache_ttl_secs: 86_400,
        }
    }
}
