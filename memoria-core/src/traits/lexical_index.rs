use crate::errors::CortexResult;

/// In-memory per-user lexical scorer (§4.1: "may be in-memory with
/// invalidation"). Unlike the vector index this has no durable backing —
/// a cold process simply starts with an empty index and rebuilds lazily.
pub trait ILexicalIndex: Send + Sync {
    /// Score `query` against every indexed item for `user_id`, returning
    /// `(memory_id, score)` pairs sorted by descending score.
    fn score(&self, user_id: &str, query: &str, limit: usize) -> CortexResult<Vec<(String, f64)>>;

    fn index(&self, user_id: &str, memory_id: &str, text: &str) -> CortexResult<()>;
    fn remove(&self, user_id: &str, memory_id: &str) -> CortexResult<()>;

    /// Drop all indexed terms for a user, forcing a rebuild on next access.
    fn invalidate_user(&self, user_id: &str) -> CortexResult<()>;
}
