/// Backup import/export errors (§6 backup payload format).
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("unsupported backup format version: {version}")]
    UnsupportedVersion { version: String },

    #[error("backup payload missing collection: {collection}")]
    MissingCollection { collection: String },

    #[error("import conflict: memory_id {memory_id} already exists and merge strategy is 'replace'-incompatible")]
    ImportConflict { memory_id: String },
}
