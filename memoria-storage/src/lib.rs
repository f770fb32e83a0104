//! # memoria-storage
//!
//! The authoritative durable store (§2 RecordStore). Backed by `rusqlite`
//! with WAL mode and a single-writer/multi-reader connection pool. The
//! vector index is a derived projection of this store, never the other
//! way around.

pub mod engine;
pub mod ghost;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use memoria_core::errors::CortexError;

/// Map a rusqlite/storage-local failure into the crate-boundary error type.
pub(crate) fn to_storage_err(reason: impl Into<String>) -> CortexError {
    CortexError::internal(reason.into(), "storage")
}
