//! Forward-only schema migrations, gated on `PRAGMA user_version`.

mod v001_items;
mod v002_ghosts;
mod v003_outcomes;
mod v004_kg;
mod v005_checkpoints;
mod v006_profiles;

use memoria_core::errors::CortexResult;
use rusqlite::Connection;

use crate::to_storage_err;

type Migration = fn(&Connection) -> CortexResult<()>;

const MIGRATIONS: &[Migration] = &[
    v001_items::migrate,
    v002_ghosts::migrate,
    v003_outcomes::migrate,
    v004_kg::migrate,
    v005_checkpoints::migrate,
    v006_profiles::migrate,
];

/// Run every migration whose ordinal exceeds the database's current
/// `user_version`, bumping it one step at a time so a crash mid-migration
/// resumes instead of re-running completed steps.
pub fn run_migrations(conn: &Connection) -> CortexResult<()> {
    let current: i64 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let ordinal = (i + 1) as i64;
        if ordinal <= current {
            continue;
        }
        migration(conn)?;
        conn.pragma_update(None, "user_version", ordinal)
            .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}
