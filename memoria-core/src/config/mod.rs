mod cold_start_config;
mod consistency_config;
mod embeddings_config;
mod lifecycle_config;
mod observability_config;
mod reliability_config;
mod retrieval_config;
mod storage_config;

pub use cold_start_config::ColdStartConfig;
pub use consistency_config::ConsistencyConfig;
pub use embeddings_config::EmbeddingsConfig;
pub use lifecycle_config::LifecycleConfig;
pub use observability_config::ObservabilityConfig;
pub use reliability_config::{CircuitBreakerConfig, TimeoutConfig};
pub use retrieval_config::RetrievalConfig;
pub use storage_config::StorageConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{CortexError, CortexResult};

/// Root configuration aggregating every subsystem's knobs (§6). Loaded once
/// at startup and shared read-only across the engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub storage: StorageConfig,
    pub retrieval: RetrievalConfig,
    pub lifecycle: LifecycleConfig,
    pub embeddings: EmbeddingsConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub timeouts: TimeoutConfig,
    pub consistency: ConsistencyConfig,
    pub observability: ObservabilityConfig,
    pub cold_start: ColdStartConfig,
}

impl EngineConfig {
    /// Parse a TOML document, falling back to defaults for any field or
    /// whole section that is absent.
    pub fn from_toml(raw: &str) -> CortexResult<Self> {
        toml::from_str(raw)
            .map_err(|e| CortexError::InvalidInput(format!("invalid config toml: {e}")))
    }

    pub fn to_toml(&self) -> CortexResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CortexError::internal(format!("failed to serialize config: {e}"), "config"))
    }
}
