//! Error taxonomy (§7).
//!
//! `CortexError` is the one error type that crosses crate boundaries. Each
//! subsystem keeps a richer local error enum (below) for its own internal
//! matching, and converts into `CortexError` at the seam.

mod backup_error;
mod retrieval_error;
mod storage_error;
mod vector_error;

pub use backup_error::BackupError;
pub use retrieval_error::RetrievalError;
pub use storage_error::StorageError;
pub use vector_error::VectorError;

/// The taxonomy every external-facing operation returns (§7).
#[derive(Debug, thiserror::Error)]
pub enum CortexError {
    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("partial result: {0}")]
    Partial(String),

    #[error("canceled: {0}")]
    Canceled(String),

    #[error("internal error [{correlation_id}]: {reason}")]
    Internal {
        reason: String,
        correlation_id: String,
    },
}

impl CortexError {
    /// Build an `internal` error, stamping a correlation id from a blake3
    /// hash of the reason plus the current process-local counter isn't
    /// available here, so callers supply one (e.g. a request id).
    pub fn internal(reason: impl Into<String>, correlation_id: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
            correlation_id: correlation_id.into(),
        }
    }

    /// True for the two fallback-eligible variants retrieval must never
    /// surface to the caller (§7: "retrieval never fails the caller on
    /// `unavailable` or `timeout`").
    pub fn is_degradable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}

impl From<StorageError> for CortexError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::DuplicateId { memory_id } => {
                Self::Conflict(format!("duplicate memory_id: {memory_id}"))
            }
            StorageError::NotFound { memory_id } => {
                Self::NotFound(format!("memory_id: {memory_id}"))
            }
            StorageError::PoolExhausted { .. } => Self::Unavailable(e.to_string()),
            other => Self::internal(other.to_string(), "storage"),
        }
    }
}

impl From<RetrievalError> for CortexError {
    fn from(e: RetrievalError) -> Self {
        match e {
            RetrievalError::StageTimeout { .. } => Self::Timeout(e.to_string()),
            RetrievalError::DependencyUnavailable { .. } => Self::Unavailable(e.to_string()),
            RetrievalError::Canceled => Self::Canceled(e.to_string()),
            RetrievalError::InvalidQuery { reason } => Self::InvalidInput(reason),
        }
    }
}

impl From<VectorError> for CortexError {
    fn from(e: VectorError) -> Self {
        match e {
            VectorError::DimensionMismatch { .. } => Self::SchemaMismatch(e.to_string()),
            VectorError::Unavailable { .. } => Self::Unavailable(e.to_string()),
            VectorError::InvalidFilter { reason } => Self::InvalidInput(reason),
        }
    }
}

impl From<BackupError> for CortexError {
    fn from(e: BackupError) -> Self {
        match e {
            BackupError::UnsupportedVersion { .. } => Self::Conflict(e.to_string()),
            BackupError::MissingCollection { .. } => Self::InvalidInput(e.to_string()),
            BackupError::ImportConflict { .. } => Self::Conflict(e.to_string()),
        }
    }
}

/// Result alias used throughout the workspace.
pub type CortexResult<T> = Result<T, CortexError>;
