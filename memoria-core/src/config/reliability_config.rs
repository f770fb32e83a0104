use serde::{Deserialize, Serialize};

/// Per-dependency circuit breaker tuning (§4.9).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the breaker trips from closed to open.
    pub failure_threshold: u32,
    /// How long the breaker stays open before allowing a half-open probe.
    pub open_duration_secs: u64,
    /// Consecutive successes in half-open required to close the breaker.
    pub success_threshold: u32,
    /// Probes admitted concurrently while half-open.
    pub half_open_max_concurrency: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            open_duration_secs: 30,
            success_threshold: 2,
            half_open_max_concurrency: 1,
        }
    }
}

/// Per-call timeout budgets handed out as [`crate::models::Deadline`]s (§5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub overall_search_ms: u64,
    pub overall_prefetch_ms: u64,
    pub embed_ms: u64,
    pub vector_search_ms: u64,
    pub lexical_search_ms: u64,
    pub rerank_ms: u64,
    pub summarize_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            overall_search_ms: 15_000,
            overall_prefetch_ms: 6_000,
            embed_ms: 3_000,
            vector_search_ms: 10_000,
            lexical_search_ms: 1_500,
            rerank_ms: 2_000,
            summarize_ms: 5_000,
        }
    }
}
