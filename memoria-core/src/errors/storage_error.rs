/// Record-store-layer errors (§7 `internal`/`conflict`/`not_found` producers).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("duplicate memory_id on insert: {memory_id}")]
    DuplicateId { memory_id: String },

    #[error("memory not found: {memory_id}")]
    NotFound { memory_id: String },

    #[error("connection pool exhausted: {active_connections} active connections")]
    PoolExhausted { active_connections: usize },
}
