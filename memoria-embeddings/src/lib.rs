//! # memoria-embeddings
//!
//! Embedder, Reranker, and Summarizer adapters (§4.4): remote HTTP providers
//! wrapped with SHA-256-keyed caches and circuit breakers, degrading to a
//! TF-IDF fallback (Embedder only) when the remote dependency is unhealthy.

pub mod engine;
pub mod hashing;
pub mod providers;
pub mod reranker;
pub mod summarizer;

pub use engine::EmbeddingEngine;
pub use reranker::RerankEngine;
pub use summarizer::SummarizerEngine;
