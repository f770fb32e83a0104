use sha2::{Digest, Sha256};

/// SHA-256 hex digest used as the cache key for embedder/reranker/summarizer
/// calls (§4.4: "LRU cache keyed by SHA-256 of the input").
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

mod hex {
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }
}
