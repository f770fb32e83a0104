use memoria_core::errors::CortexResult;
use memoria_core::models::{KgEdge, KgNode};
use rusqlite::{params, Connection};

use crate::to_storage_err;

pub fn put_node(conn: &Connection, node: &KgNode) -> CortexResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO kg_nodes (node_id, user_id, label, kind, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            node.node_id,
            node.user_id,
            node.label,
            node.kind,
            node.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn put_edge(conn: &Connection, edge: &KgEdge) -> CortexResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO kg_edges \
         (edge_id, user_id, source_node_id, target_node_id, relation, memory_id, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            edge.edge_id,
            edge.user_id,
            edge.source_node_id,
            edge.target_node_id,
            edge.relation,
            edge.memory_id,
            edge.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn edges_for(conn: &Connection, node_id: &str) -> CortexResult<Vec<KgEdge>> {
    let mut stmt = conn
        .prepare(
            "SELECT edge_id, user_id, source_node_id, target_node_id, relation, memory_id, created_at \
             FROM kg_edges WHERE source_node_id = ?1 OR target_node_id = ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![node_id], |row| {
            let created_at: String = row.get(6)?;
            Ok((
                KgEdge {
                    edge_id: row.get(0)?,
                    user_id: row.get(1)?,
                    source_node_id: row.get(2)?,
                    target_node_id: row.get(3)?,
                    relation: row.get(4)?,
                    memory_id: row.get(5)?,
                    created_at: chrono::Utc::now(),
                },
                created_at,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (mut edge, created_at) = row.map_err(|e| to_storage_err(e.to_string()))?;
        edge.created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| to_storage_err(e.to_string()))?
            .with_timezone(&chrono::Utc);
        out.push(edge);
    }
    Ok(out)
}
