//! `EmbeddingEngine` — wraps a primary remote provider with a SHA-256-keyed
//! cache and circuit breaker (§4.4, §4.9).
//!
//! `IEmbedder::embed`/`embed_batch` propagate the breaker's verdict
//! faithfully (§4.5 stage 3: "on breaker-open or timeout: skip vector
//! stage"), so the retrieval pipeline can distinguish "no vector signal" from
//! "a vector signal, just a degraded one". Callers that need a vector no
//! matter what (e.g. ingestion, which must always produce *some* embedding to
//! store) use [`EmbeddingEngine::embed_resilient`] instead, which degrades to
//! TF-IDF rather than failing.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use memoria_core::config::EmbeddingsConfig;
use memoria_core::errors::CortexResult;
use memoria_core::models::Deadline;
use memoria_core::traits::IEmbedder;
use memoria_reliability::CircuitBreaker;

use crate::hashing::sha256_hex;
use crate::providers::TfIdfFallback;

pub struct EmbeddingEngine {
    primary: Arc<dyn IEmbedder>,
    fallback: TfIdfFallback,
    breaker: CircuitBreaker,
    cache: Cache<String, Vec<f32>>,
}

impl EmbeddingEngine {
    pub fn new(primary: Arc<dyn IEmbedder>, config: &EmbeddingsConfig) -> Self {
        let dims = primary.dimensions();
        let cache = Cache::builder()
            .max_capacity(config.embedding_cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();
        Self {
            primary,
            fallback: TfIdfFallback::new(dims),
            breaker: CircuitBreaker::new("embedder", Default::default()),
            cache,
        }
    }

    pub fn with_breaker(mut self, breaker: CircuitBreaker) -> Self {
        self.breaker = breaker;
        self
    }

    /// Name and current state of the embedder's breaker, for health reporting.
    pub fn breaker_state(&self) -> (String, String) {
        (self.breaker.name().to_string(), format!("{:?}", self.breaker.state()))
    }

    /// Approximate entry count, used as a stand-in for a cache hit rate
    /// (`moka::sync::Cache` exposes no hit/miss counters without explicit
    /// instrumentation, which isn't wired in here).
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    fn embed_one(&self, text: &str, deadline: Deadline) -> CortexResult<Vec<f32>> {
        let key = sha256_hex(text);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }
        let primary = &self.primary;
        let embedding = self.breaker.call(|| primary.embed(text, deadline))?;
        self.cache.insert(key, embedding.clone());
        Ok(embedding)
    }

    fn embed_one_resilient(&self, text: &str, deadline: Deadline) -> CortexResult<Vec<f32>> {
        match self.embed_one(text, deadline) {
            Ok(v) => Ok(v),
            Err(e) => {
                debug!(error = %e, "embedder unavailable, using tfidf fallback");
                self.fallback.embed(text, deadline)
            }
        }
    }

    /// Like `embed`, but degrades to TF-IDF instead of failing (used by
    /// callers, such as ingestion, that must always produce a vector).
    pub fn embed_resilient(&self, text: &str, deadline: Deadline) -> CortexResult<Vec<f32>> {
        self.embed_one_resilient(text, deadline)
    }

    pub fn embed_batch_resilient(&self, texts: &[String], deadline: Deadline) -> CortexResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_one_resilient(t, deadline)).collect()
    }
}

impl IEmbedder for EmbeddingEngine {
    fn embed(&self, text: &str, deadline: Deadline) -> CortexResult<Vec<f32>> {
        self.embed_one(text, deadline)
    }

    fn embed_batch(&self, texts: &[String], deadline: Deadline) -> CortexResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_one(t, deadline)).collect()
    }

    fn dimensions(&self) -> usize {
        self.primary.dimensions()
    }

    fn model_name(&self) -> &str {
        self.primary.model_name()
    }
}
