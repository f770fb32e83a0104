use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Knowledge-graph node (§3 supporting entities).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KgNode {
    pub node_id: String,
    pub user_id: String,
    pub label: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

/// Knowledge-graph edge between two nodes, optionally anchored to a memory item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KgEdge {
    pub edge_id: String,
    pub user_id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub relation: String,
    pub memory_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
