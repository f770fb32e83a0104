/// Retrieval-pipeline errors (§7 `timeout`/`unavailable`/`partial` producers).
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("stage '{stage}' timed out after {elapsed_ms}ms")]
    StageTimeout { stage: String, elapsed_ms: u64 },

    #[error("dependency '{dependency}' unavailable: breaker open")]
    DependencyUnavailable { dependency: String },

    #[error("request canceled before useful work completed")]
    Canceled,

    #[error("invalid query: {reason}")]
    InvalidQuery { reason: String },
}
