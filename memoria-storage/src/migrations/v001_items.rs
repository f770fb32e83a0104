//! v001: memory_items — the authoritative table behind `MemoryItem` (§3).

use memoria_core::errors::CortexResult;
use rusqlite::Connection;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS memory_items (
            memory_id       TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL,
            org_id          TEXT,
            tier            TEXT NOT NULL,
            status          TEXT NOT NULL,
            text            TEXT NOT NULL,
            summary         TEXT,
            tags_json       TEXT NOT NULL DEFAULT '[]',
            entities_json   TEXT NOT NULL DEFAULT '[]',
            source_json     TEXT NOT NULL,
            quality_json    TEXT NOT NULL,
            stats_json      TEXT NOT NULL,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL,
            archived_at     TEXT,
            expires_at      TEXT,
            embedding_json  TEXT,
            versioning_json TEXT NOT NULL,
            personality_json TEXT,
            language        TEXT NOT NULL,
            always_inject   INTEGER NOT NULL DEFAULT 0,
            needs_reindex   INTEGER NOT NULL DEFAULT 1,
            reindex_reason  TEXT,
            sanitized_backup TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_items_user_tier ON memory_items(user_id, tier);
        CREATE INDEX IF NOT EXISTS idx_items_user_status ON memory_items(user_id, status);
        CREATE INDEX IF NOT EXISTS idx_items_expires ON memory_items(tier, expires_at);
        CREATE INDEX IF NOT EXISTS idx_items_needs_reindex ON memory_items(needs_reindex);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
