//! v002: ghost registry (§3 invariants: orthogonal to `status`).

use memoria_core::errors::CortexResult;
use rusqlite::Connection;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS ghosts (
            user_id     TEXT NOT NULL,
            memory_id   TEXT NOT NULL,
            ghosted_at  TEXT NOT NULL,
            PRIMARY KEY (user_id, memory_id)
        );

        CREATE INDEX IF NOT EXISTS idx_ghosts_user ON ghosts(user_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
