//! `RerankEngine` — breaker-guarded cross-encoder reranker with a per-pair
//! score cache (§4.4, §4.9). On a breaker-open or failed call, propagates the
//! error so the retrieval pipeline can record `fallback` and skip the stage
//! (§4.5 stage 6) rather than silently degrading scores.

use std::time::Duration;

use moka::sync::Cache;

use memoria_core::config::EmbeddingsConfig;
use memoria_core::errors::CortexResult;
use memoria_core::models::Deadline;
use memoria_core::traits::IReranker;
use memoria_reliability::CircuitBreaker;

use crate::hashing::sha256_hex;

pub struct RerankEngine<R: IReranker> {
    inner: R,
    breaker: CircuitBreaker,
    cache: Cache<String, f64>,
}

impl<R: IReranker> RerankEngine<R> {
    pub fn new(inner: R, config: &EmbeddingsConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.rerank_cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();
        Self {
            inner,
            breaker: CircuitBreaker::new("reranker", Default::default()),
            cache,
        }
    }

    pub fn with_breaker(mut self, breaker: CircuitBreaker) -> Self {
        self.breaker = breaker;
        self
    }

    fn cache_key(query: &str, passage: &str) -> String {
        sha256_hex(&format!("{query}\u{0}{passage}"))
    }
}

impl<R: IReranker> IReranker for RerankEngine<R> {
    fn rerank(&self, query: &str, candidates: &[String], deadline: Deadline) -> CortexResult<Vec<f64>> {
        let mut scores = vec![None; candidates.len()];
        let mut misses = Vec::new();

        for (i, passage) in candidates.iter().enumerate() {
            let key = Self::cache_key(query, passage);
            if let Some(score) = self.cache.get(&key) {
                scores[i] = Some(score);
            } else {
                misses.push(i);
            }
        }

        if !misses.is_empty() {
            let miss_passages: Vec<String> = misses.iter().map(|&i| candidates[i].clone()).collect();
            let inner = &self.inner;
            let fresh = self.breaker.call(|| inner.rerank(query, &miss_passages, deadline))?;
            for (&i, score) in misses.iter().zip(fresh) {
                self.cache.insert(Self::cache_key(query, &candidates[i]), score);
                scores[i] = Some(score);
            }
        }

        Ok(scores.into_iter().map(|s| s.unwrap_or(0.0)).collect())
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
