//! Hybrid retrieval pipeline (§4.5): embed the query, fan out to vector and
//! lexical candidate generation, fuse via RRF, optionally rerank with a
//! cross-encoder, apply per-item dynamic weighting and `memory_bank` quality
//! enforcement, filter ghosts, and label confidence.

pub mod candidate;
pub mod confidence;
pub mod entity_prefilter;
pub mod pipeline;
pub mod quality_enforcement;
pub mod query_understanding;
pub mod rrf;
pub mod weighting;

pub use candidate::Candidate;
pub use pipeline::{RetrievalParams, RetrievalPipeline};
