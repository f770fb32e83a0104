//! v005: reindex checkpoints and the consistency log (§4.12-4.13).

use memoria_core::errors::CortexResult;
use rusqlite::Connection;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS reindex_checkpoints (
            job_id          TEXT PRIMARY KEY,
            user_id         TEXT,
            tier            TEXT,
            last_memory_id  TEXT,
            processed       INTEGER NOT NULL DEFAULT 0,
            total           INTEGER,
            updated_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS consistency_log (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            event_type  TEXT NOT NULL,
            memory_id   TEXT NOT NULL,
            details     TEXT NOT NULL,
            repaired    INTEGER NOT NULL DEFAULT 0,
            logged_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_consistency_log_memory ON consistency_log(memory_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
