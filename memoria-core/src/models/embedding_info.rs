use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Embedding provenance attached to an item (§3 `embedding`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingInfo {
    pub model: String,
    pub dims: usize,
    /// blake3 hash of the text that was last indexed (§3 invariant: `vector_hash == hash(current indexed text)`).
    pub vector_hash: String,
    pub last_indexed_at: Option<DateTime<Utc>>,
}

impl EmbeddingInfo {
    pub fn hash_text(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Whether the recorded hash matches the current text — if not, the item
    /// needs reindexing (§3 invariant).
    pub fn matches(&self, text: &str) -> bool {
        self.vector_hash == Self::hash_text(text)
    }
}
