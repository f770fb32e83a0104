//! Append-only log of consistency-sweep actions (§4.12).

use memoria_core::errors::CortexResult;
use memoria_core::models::{ConsistencyEventType, ConsistencyLogEntry};
use rusqlite::{params, Connection};

use crate::to_storage_err;

fn event_type_str(event_type: ConsistencyEventType) -> &'static str {
    match event_type {
        ConsistencyEventType::MissingVectorPoint => "missing_vector_point",
        ConsistencyEventType::OrphanVectorPoint => "orphan_vector_point",
        ConsistencyEventType::VectorHashMismatch => "vector_hash_mismatch",
    }
}

pub fn log(conn: &Connection, entry: &ConsistencyLogEntry) -> CortexResult<()> {
    conn.execute(
        "INSERT INTO consistency_log (event_type, memory_id, details, repaired, logged_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            event_type_str(entry.event_type),
            entry.memory_id,
            entry.details,
            entry.repaired as i64,
            entry.logged_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
