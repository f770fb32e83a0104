//! StorageEngine — owns the `ConnectionPool`, implements `IRecordStore`,
//! startup migrations, and the write-through ghost cache.

use std::path::Path;

use chrono::{DateTime, Utc};

use memoria_core::config::StorageConfig;
use memoria_core::errors::CortexResult;
use memoria_core::models::{
    ActionOutcome, ConsistencyLogEntry, KgEdge, KgNode, MemoryItem, OutcomeEvent,
    ReindexCheckpoint, Tier, UserProfile,
};
use memoria_core::traits::IRecordStore;

use crate::ghost::GhostCache;
use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;

pub struct StorageEngine {
    pool: ConnectionPool,
    ghosts: GhostCache,
}

impl StorageEngine {
    pub fn open(path: &Path, cfg: &StorageConfig) -> CortexResult<Self> {
        let pool = ConnectionPool::open(path, cfg)?;
        let engine = Self {
            pool,
            ghosts: GhostCache::new(),
        };
        engine.initialize()?;
        Ok(engine)
    }

    pub fn open_in_memory() -> CortexResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let engine = Self {
            pool,
            ghosts: GhostCache::new(),
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> CortexResult<()> {
        self.pool.writer.with_conn(migrations::run_migrations)
    }

    /// Ensure the ghost cache has been warmed for this user before serving
    /// `is_ghost`/`ghost_ids` from memory.
    fn ensure_warm(&self, user_id: &str) -> CortexResult<()> {
        if self.ghosts.is_warm(user_id) {
            return Ok(());
        }
        let ids = self
            .pool
            .with_reader(|conn| queries::ghost_ops::ids_for_user(conn, user_id))?;
        self.ghosts.warm(user_id, ids);
        Ok(())
    }
}

impl IRecordStore for StorageEngine {
    fn put(&self, item: &MemoryItem) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::item_crud::insert(conn, item))
    }

    fn put_bulk(&self, items: &[MemoryItem]) -> CortexResult<usize> {
        self.pool
            .writer
            .with_conn(|conn| queries::item_crud::insert_bulk(conn, items))
    }

    fn get(&self, user_id: &str, memory_id: &str) -> CortexResult<Option<MemoryItem>> {
        self.pool
            .with_reader(|conn| queries::item_crud::get(conn, user_id, memory_id))
    }

    fn get_bulk(&self, user_id: &str, memory_ids: &[String]) -> CortexResult<Vec<MemoryItem>> {
        self.pool
            .with_reader(|conn| queries::item_crud::get_bulk(conn, user_id, memory_ids))
    }

    fn update(&self, item: &MemoryItem) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::item_crud::update(conn, item))
    }

    fn delete(&self, user_id: &str, memory_id: &str) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::item_crud::delete(conn, user_id, memory_id))
    }

    fn list_by_tier(
        &self,
        user_id: &str,
        tier: Tier,
        limit: usize,
        offset: usize,
    ) -> CortexResult<Vec<MemoryItem>> {
        self.pool
            .with_reader(|conn| queries::item_crud::list_by_tier(conn, user_id, tier, limit, offset))
    }

    fn list_needing_reindex(&self, limit: usize) -> CortexResult<Vec<MemoryItem>> {
        self.pool
            .with_reader(|conn| queries::item_crud::list_needing_reindex(conn, limit))
    }

    fn list_expired(
        &self,
        tier: Tier,
        as_of: DateTime<Utc>,
        limit: usize,
    ) -> CortexResult<Vec<MemoryItem>> {
        self.pool
            .with_reader(|conn| queries::item_crud::list_expired(conn, tier, as_of, limit))
    }

    fn sample_active(&self, user_id: &str, limit: usize) -> CortexResult<Vec<MemoryItem>> {
        self.pool
            .with_reader(|conn| queries::item_crud::sample_active(conn, user_id, limit))
    }

    fn list_user_ids(&self, limit: usize) -> CortexResult<Vec<String>> {
        self.pool
            .with_reader(|conn| queries::item_crud::list_user_ids(conn, limit))
    }

    fn count_by_tier(&self, user_id: &str) -> CortexResult<Vec<(Tier, usize)>> {
        self.pool
            .with_reader(|conn| queries::item_crud::count_by_tier(conn, user_id))
    }

    fn mark_ghost(&self, user_id: &str, memory_id: &str) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::ghost_ops::mark(conn, user_id, memory_id))?;
        self.ghosts.insert(user_id, memory_id);
        Ok(())
    }

    fn unmark_ghost(&self, user_id: &str, memory_id: &str) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::ghost_ops::unmark(conn, user_id, memory_id))?;
        self.ghosts.remove(user_id, memory_id);
        Ok(())
    }

    fn is_ghost(&self, user_id: &str, memory_id: &str) -> CortexResult<bool> {
        self.ensure_warm(user_id)?;
        Ok(self.ghosts.contains(user_id, memory_id).unwrap_or(false))
    }

    fn ghost_ids(&self, user_id: &str) -> CortexResult<Vec<String>> {
        self.ensure_warm(user_id)?;
        Ok(self.ghosts.ids(user_id).unwrap_or_default())
    }

    fn record_outcome(&self, event: &OutcomeEvent) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::outcome_ops::record_event(conn, event))
    }

    fn record_action_outcome(&self, outcome: &ActionOutcome) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::outcome_ops::record_action_outcome(conn, outcome))
    }

    fn put_kg_node(&self, node: &KgNode) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::kg_ops::put_node(conn, node))
    }

    fn put_kg_edge(&self, edge: &KgEdge) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::kg_ops::put_edge(conn, edge))
    }

    fn kg_edges_for(&self, node_id: &str) -> CortexResult<Vec<KgEdge>> {
        self.pool
            .with_reader(|conn| queries::kg_ops::edges_for(conn, node_id))
    }

    fn get_profile(&self, user_id: &str) -> CortexResult<Option<UserProfile>> {
        self.pool
            .with_reader(|conn| queries::profile_ops::get(conn, user_id))
    }

    fn put_profile(&self, profile: &UserProfile) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::profile_ops::put(conn, profile))
    }

    fn save_checkpoint(&self, checkpoint: &ReindexCheckpoint) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::checkpoint_ops::save(conn, checkpoint))
    }

    fn load_checkpoint(&self, job_id: &str) -> CortexResult<Option<ReindexCheckpoint>> {
        self.pool
            .with_reader(|conn| queries::checkpoint_ops::load(conn, job_id))
    }

    fn clear_checkpoint(&self, job_id: &str) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::checkpoint_ops::clear(conn, job_id))
    }

    fn log_consistency_event(&self, entry: &ConsistencyLogEntry) -> CortexResult<()> {
        self.pool
            .writer
            .with_conn(|conn| queries::consistency_ops::log(conn, entry))
    }

    fn vacuum(&self) -> CortexResult<()> {
        self.pool.writer.with_conn(queries::maintenance::full_vacuum)
    }
}
