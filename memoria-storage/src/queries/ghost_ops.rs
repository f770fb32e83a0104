use chrono::Utc;
use memoria_core::errors::CortexResult;
use rusqlite::{params, Connection, OptionalExtension};

use crate::to_storage_err;

pub fn mark(conn: &Connection, user_id: &str, memory_id: &str) -> CortexResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO ghosts (user_id, memory_id, ghosted_at) VALUES (?1, ?2, ?3)",
        params![user_id, memory_id, Utc::now().to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn unmark(conn: &Connection, user_id: &str, memory_id: &str) -> CortexResult<()> {
    conn.execute(
        "DELETE FROM ghosts WHERE user_id = ?1 AND memory_id = ?2",
        params![user_id, memory_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn is_ghost(conn: &Connection, user_id: &str, memory_id: &str) -> CortexResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM ghosts WHERE user_id = ?1 AND memory_id = ?2",
            params![user_id, memory_id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(found.is_some())
}

pub fn ids_for_user(conn: &Connection, user_id: &str) -> CortexResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT memory_id FROM ghosts WHERE user_id = ?1")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![user_id], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
