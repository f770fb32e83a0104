use memoria_core::errors::CortexResult;
use memoria_core::models::ReindexCheckpoint;
use rusqlite::{params, Connection, OptionalExtension};

use crate::to_storage_err;

pub fn save(conn: &Connection, checkpoint: &ReindexCheckpoint) -> CortexResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO reindex_checkpoints \
         (job_id, user_id, tier, last_memory_id, processed, total, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            checkpoint.job_id,
            checkpoint.user_id,
            checkpoint.tier,
            checkpoint.last_memory_id,
            checkpoint.processed as i64,
            checkpoint.total.map(|t| t as i64),
            checkpoint.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn load(conn: &Connection, job_id: &str) -> CortexResult<Option<ReindexCheckpoint>> {
    conn.query_row(
        "SELECT job_id, user_id, tier, last_memory_id, processed, total, updated_at \
         FROM reindex_checkpoints WHERE job_id = ?1",
        params![job_id],
        |row| {
            let updated_at: String = row.get(6)?;
            let processed: i64 = row.get(4)?;
            let total: Option<i64> = row.get(5)?;
            Ok((
                ReindexCheckpoint {
                    job_id: row.get(0)?,
                    user_id: row.get(1)?,
                    tier: row.get(2)?,
                    last_memory_id: row.get(3)?,
                    processed: processed as u64,
                    total: total.map(|t| t as u64),
                    updated_at: chrono::Utc::now(),
                },
                updated_at,
            ))
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .map(|(mut checkpoint, updated_at)| {
        checkpoint.updated_at = chrono::DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| to_storage_err(e.to_string()))?
            .with_timezone(&chrono::Utc);
        Ok(checkpoint)
    })
    .transpose()
}

pub fn clear(conn: &Connection, job_id: &str) -> CortexResult<()> {
    conn.execute(
        "DELETE FROM reindex_checkpoints WHERE job_id = ?1",
        params![job_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
