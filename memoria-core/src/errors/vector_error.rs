/// Vector-index errors (§7 `schema_mismatch`/`invalid_input` producers).
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("vector backend unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("invalid filter: {reason}")]
    InvalidFilter { reason: String },
}
