//! # memoria-reliability
//!
//! Circuit breaker protecting calls to an external dependency (§4.9). Each
//! dependency (embedder, reranker, summarizer, vector index, lexical index)
//! owns one `CircuitBreaker` instance; there is no global registry — state
//! is process-local and explicit, per the engine's "no singletons" policy.

pub mod breaker;

pub use breaker::{BreakerState, CircuitBreaker, Permit};
