use memoria_core::errors::CortexResult;
use rusqlite::Connection;

use crate::to_storage_err;

pub fn full_vacuum(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch("PRAGMA incremental_vacuum; VACUUM;")
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
