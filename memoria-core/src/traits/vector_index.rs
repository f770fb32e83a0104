use crate::errors::CortexResult;
use crate::models::{Status, Tier};

/// A single hit returned by a vector similarity search: memory id and
/// cosine similarity in `[-1, 1]` (normally `[0, 1]` for normalized embeddings).
#[derive(Debug, Clone, Copy)]
pub struct VectorHit<'a> {
    pub memory_id: &'a str,
    pub similarity: f64,
}

/// Best-effort secondary index over item embeddings (§2, §4.1). Never the
/// source of truth: a missing or stale vector point is a repairable
/// consistency defect, not data loss.
///
/// Every point carries its item's `tier`/`status` as payload alongside the
/// vector, so `delete_by_filter` can purge by those fields directly (§4.2
/// `deleteByFilter({user, tier?, status?})`) rather than requiring the
/// caller to already know the full id set.
pub trait IVectorIndex: Send + Sync {
    /// Ensure the backing collection/schema exists for the given dimensionality.
    fn ensure_schema(&self, dims: usize) -> CortexResult<()>;

    fn upsert(
        &self,
        user_id: &str,
        memory_id: &str,
        vector: &[f32],
        tier: Tier,
        status: Status,
    ) -> CortexResult<()>;
    fn upsert_batch(
        &self,
        user_id: &str,
        points: &[(String, Vec<f32>, Tier, Status)],
    ) -> CortexResult<usize>;

    fn search(
        &self,
        user_id: &str,
        query: &[f32],
        limit: usize,
        entity_filter: Option<&[String]>,
    ) -> CortexResult<Vec<(String, f64)>>;

    fn filter_by_entities(
        &self,
        user_id: &str,
        entities: &[String],
        limit: usize,
    ) -> CortexResult<Vec<String>>;

    fn delete(&self, user_id: &str, memory_id: &str) -> CortexResult<()>;

    /// Delete every point for `user_id` matching `tier` (when given) and
    /// `status` (when given); either filter left `None` matches any value
    /// for that field. Returns the number of points removed.
    fn delete_by_filter(
        &self,
        user_id: &str,
        tier: Option<Tier>,
        status: Option<Status>,
    ) -> CortexResult<usize>;

    /// Page through every point for a user, for consistency checking (§4.12).
    fn scroll(&self, user_id: &str, cursor: Option<&str>, limit: usize)
        -> CortexResult<(Vec<String>, Option<String>)>;

    fn contains(&self, user_id: &str, memory_id: &str) -> CortexResult<bool>;
}
