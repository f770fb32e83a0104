use serde::{Deserialize, Serialize};

/// `rusqlite` connection and pragma tuning (§2).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    pub wal_mode: bool,
    pub mmap_size: i64,
    pub cache_size: i64,
    pub busy_timeout_ms: u64,
    pub read_pool_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "memoria.db".to_string(),
            wal_mode: true,
            mmap_size: 268_435_456,
            cache_size: -64_000,
            busy_timeout_ms: 5_000,
            read_pool_size: 4,
        }
    }
}
