//! v006: per-user profiles (§2).

use memoria_core::errors::CortexResult;
use rusqlite::Connection;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS user_profiles (
            user_id     TEXT PRIMARY KEY,
            goals_json  TEXT NOT NULL DEFAULT '[]',
            values_json TEXT NOT NULL DEFAULT '[]',
            data_json   TEXT NOT NULL DEFAULT '{}'
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
