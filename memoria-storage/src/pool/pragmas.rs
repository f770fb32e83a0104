//! PRAGMA configuration applied to every SQLite connection.

use rusqlite::Connection;

use memoria_core::errors::CortexResult;

use crate::to_storage_err;

/// Apply write-connection pragmas: WAL, NORMAL sync, configured mmap/cache,
/// busy_timeout, foreign keys, incremental auto_vacuum.
pub fn apply_write_pragmas(conn: &Connection, mmap_size: i64, cache_size: i64, busy_timeout_ms: u64) -> CortexResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA mmap_size = {mmap_size};
        PRAGMA cache_size = {cache_size};
        PRAGMA busy_timeout = {busy_timeout_ms};
        PRAGMA foreign_keys = ON;
        PRAGMA auto_vacuum = INCREMENTAL;
        "
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Apply read-connection pragmas (no write-mode tuning needed).
pub fn apply_read_pragmas(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA query_only = ON;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn verify_wal_mode(conn: &Connection) -> CortexResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
