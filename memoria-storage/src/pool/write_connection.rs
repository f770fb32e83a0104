use std::path::Path;
use std::sync::Mutex;

use memoria_core::config::StorageConfig;
use memoria_core::errors::CortexResult;
use rusqlite::Connection;

use super::pragmas::apply_write_pragmas;
use crate::to_storage_err;

/// The single write connection. SQLite serializes writers anyway; a mutex
/// here just makes that serialization explicit in our own types instead of
/// relying on SQLITE_BUSY retries under contention.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, cfg: &StorageConfig) -> CortexResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_write_pragmas(&conn, cfg.mmap_size, cfg.cache_size, cfg.busy_timeout_ms)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> CortexResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_write_pragmas(&conn, 0, -2_000, 5_000)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> CortexResult<T>
    where
        F: FnOnce(&Connection) -> CortexResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("writer lock poisoned: {e}")))?;
        f(&guard)
    }
}
