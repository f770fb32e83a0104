//! v003: outcome events (§3 supporting entities, §4.7).

use memoria_core::errors::CortexResult;
use rusqlite::Connection;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS outcome_events (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            memory_id           TEXT NOT NULL,
            user_id             TEXT NOT NULL,
            outcome             TEXT NOT NULL,
            related_memory_ids_json TEXT NOT NULL DEFAULT '[]',
            recorded_at         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_outcomes_memory ON outcome_events(memory_id);

        CREATE TABLE IF NOT EXISTS action_outcomes (
            action_id       TEXT PRIMARY KEY,
            memory_id       TEXT NOT NULL,
            outcome         TEXT NOT NULL,
            key_takeaway    TEXT,
            recorded_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_action_outcomes_memory ON action_outcomes(memory_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
