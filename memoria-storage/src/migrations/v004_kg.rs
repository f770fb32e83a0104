//! v004: knowledge-graph nodes and edges (§3 supporting entities).

use memoria_core::errors::CortexResult;
use rusqlite::Connection;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CortexResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS kg_nodes (
            node_id     TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            label       TEXT NOT NULL,
            kind        TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_kg_nodes_user ON kg_nodes(user_id);

        CREATE TABLE IF NOT EXISTS kg_edges (
            edge_id         TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL,
            source_node_id  TEXT NOT NULL,
            target_node_id  TEXT NOT NULL,
            relation        TEXT NOT NULL,
            memory_id       TEXT,
            created_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_kg_edges_source ON kg_edges(source_node_id);
        CREATE INDEX IF NOT EXISTS idx_kg_edges_target ON kg_edges(target_node_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
