//! Facade-local configuration that has no home in [`memoria_core::EngineConfig`]:
//! the three provider endpoints. Every other knob (timeouts, weights,
//! promotion thresholds, ...) lives in `EngineConfig` and is loaded the
//! normal way (`EngineConfig::from_toml` / `Default`).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Remote embedder/reranker/summarizer endpoints (§4.4). `EmbeddingsConfig`
/// only carries cache/batch sizing, so the actual provider wiring is
/// supplied here instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub embedder_endpoint: String,
    pub embedder_model: String,
    pub embedder_dimensions: usize,
    pub reranker_endpoint: String,
    pub reranker_model: String,
    pub reranker_max_batch_size: usize,
    pub summarizer_endpoint: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            embedder_endpoint: "http://localhost:8081/embed".to_string(),
            embedder_model: "text-embedding".to_string(),
            embedder_dimensions: 384,
            reranker_endpoint: "http://localhost:8081/rerank".to_string(),
            reranker_model: "cross-encoder".to_string(),
            reranker_max_batch_size: 32,
            summarizer_endpoint: "http://localhost:8081/summarize".to_string(),
        }
    }
}

/// Options for constructing a [`crate::MemoriaEngine`] (§6).
#[derive(Default)]
pub struct MemoriaOptions {
    /// Path to the SQLite database. `None` opens an in-memory store.
    pub db_path: Option<PathBuf>,
    /// TOML document for [`memoria_core::EngineConfig`]. `None` uses defaults.
    pub config_toml: Option<String>,
    pub providers: ProviderConfig,
}
