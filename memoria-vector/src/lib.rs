//! # memoria-vector
//!
//! Best-effort secondary index over item embeddings (§2, §4.1). A brute
//! force, per-user cosine-similarity scan — deliberately simple, since the
//! `RecordStore` is the source of truth and this index is rebuildable.

pub mod index;
pub mod similarity;

pub use index::InMemoryVectorIndex;
