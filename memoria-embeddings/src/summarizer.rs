//! `SummarizerEngine` — breaker-guarded summarizer that never surfaces an
//! error to the caller (§4.4: "returns empty string on failure or
//! breaker-open; result is cached even when empty (negative cache) to avoid
//! re-paying").

use std::time::Duration;

use moka::sync::Cache;
use tracing::debug;

use memoria_core::config::EmbeddingsConfig;
use memoria_core::errors::CortexResult;
use memoria_core::models::Deadline;
use memoria_core::traits::ISummarizer;
use memoria_reliability::CircuitBreaker;

use crate::hashing::sha256_hex;

pub struct SummarizerEngine<S: ISummarizer> {
    inner: S,
    breaker: CircuitBreaker,
    cache: Cache<String, String>,
}

impl<S: ISummarizer> SummarizerEngine<S> {
    pub fn new(inner: S, config: &EmbeddingsConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.summary_cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();
        Self {
            inner,
            breaker: CircuitBreaker::new("summarizer", Default::default()),
            cache,
        }
    }

    pub fn with_breaker(mut self, breaker: CircuitBreaker) -> Self {
        self.breaker = breaker;
        self
    }

    fn cache_key(text: &str, max_chars: usize) -> String {
        sha256_hex(&format!("{max_chars}\u{0}{text}"))
    }
}

impl<S: ISummarizer> ISummarizer for SummarizerEngine<S> {
    fn summarize(&self, text: &str, max_chars: usize, deadline: Deadline) -> CortexResult<String> {
        let key = Self::cache_key(text, max_chars);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let inner = &self.inner;
        let summary = match self.breaker.call(|| inner.summarize(text, max_chars, deadline)) {
            Ok(s) => s,
            Err(e) => {
                debug!(error = %e, "summarizer unavailable, returning empty negative-cached result");
                String::new()
            }
        };

        self.cache.insert(key, summary.clone());
        Ok(summary)
    }
}
