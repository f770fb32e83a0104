use chrono::{DateTime, Utc};

use crate::errors::CortexResult;
use crate::models::{
    ActionOutcome, ConsistencyLogEntry, KgEdge, KgNode, MemoryItem, OutcomeEvent,
    ReindexCheckpoint, Tier, UserProfile,
};

/// Authoritative durable store for memory items and their supporting
/// entities (§2). The `RecordStore` is the single source of truth; the
/// vector index is a derived, best-effort projection of it.
pub trait IRecordStore: Send + Sync {
    fn put(&self, item: &MemoryItem) -> CortexResult<()>;
    fn put_bulk(&self, items: &[MemoryItem]) -> CortexResult<usize>;
    fn get(&self, user_id: &str, memory_id: &str) -> CortexResult<Option<MemoryItem>>;
    fn get_bulk(&self, user_id: &str, memory_ids: &[String]) -> CortexResult<Vec<MemoryItem>>;
    fn update(&self, item: &MemoryItem) -> CortexResult<()>;
    fn delete(&self, user_id: &str, memory_id: &str) -> CortexResult<()>;

    fn list_by_tier(
        &self,
        user_id: &str,
        tier: Tier,
        limit: usize,
        offset: usize,
    ) -> CortexResult<Vec<MemoryItem>>;
    fn list_needing_reindex(&self, limit: usize) -> CortexResult<Vec<MemoryItem>>;
    fn list_expired(&self, tier: Tier, as_of: DateTime<Utc>, limit: usize)
        -> CortexResult<Vec<MemoryItem>>;

    /// A sample of active items for one user, for the consistency sweep (§4.12).
    fn sample_active(&self, user_id: &str, limit: usize) -> CortexResult<Vec<MemoryItem>>;
    /// Distinct user ids carrying active items, for sweeps that iterate every user.
    fn list_user_ids(&self, limit: usize) -> CortexResult<Vec<String>>;

    fn count_by_tier(&self, user_id: &str) -> CortexResult<Vec<(Tier, usize)>>;

    // --- Ghost registry (§3 invariants: orthogonal to status) ---
    fn mark_ghost(&self, user_id: &str, memory_id: &str) -> CortexResult<()>;
    fn unmark_ghost(&self, user_id: &str, memory_id: &str) -> CortexResult<()>;
    fn is_ghost(&self, user_id: &str, memory_id: &str) -> CortexResult<bool>;
    fn ghost_ids(&self, user_id: &str) -> CortexResult<Vec<String>>;

    // --- Outcomes & causal graph (§3 supporting entities) ---
    fn record_outcome(&self, event: &OutcomeEvent) -> CortexResult<()>;
    fn record_action_outcome(&self, outcome: &ActionOutcome) -> CortexResult<()>;
    fn put_kg_node(&self, node: &KgNode) -> CortexResult<()>;
    fn put_kg_edge(&self, edge: &KgEdge) -> CortexResult<()>;
    fn kg_edges_for(&self, node_id: &str) -> CortexResult<Vec<KgEdge>>;

    // --- Profile (§2) ---
    fn get_profile(&self, user_id: &str) -> CortexResult<Option<UserProfile>>;
    fn put_profile(&self, profile: &UserProfile) -> CortexResult<()>;

    // --- Reindex checkpoints (§4.13) ---
    fn save_checkpoint(&self, checkpoint: &ReindexCheckpoint) -> CortexResult<()>;
    fn load_checkpoint(&self, job_id: &str) -> CortexResult<Option<ReindexCheckpoint>>;
    fn clear_checkpoint(&self, job_id: &str) -> CortexResult<()>;

    // --- Consistency log (§4.12) ---
    fn log_consistency_event(&self, entry: &ConsistencyLogEntry) -> CortexResult<()>;

    // --- Maintenance ---
    fn vacuum(&self) -> CortexResult<()>;
}
