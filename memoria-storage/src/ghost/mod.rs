//! Per-user ghost cache with write-through to `RecordStore` (§3 invariants:
//! ghosting is orthogonal to `status` and must never be lost on restart).

use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::RwLock;

/// `user_id -> ghosted memory_ids`. Populated lazily on first access per
/// user and kept in sync by `mark`/`unmark` write-through calls.
#[derive(Default)]
pub struct GhostCache {
    by_user: DashMap<String, RwLock<HashSet<String>>>,
}

impl GhostCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warm(&self, user_id: &str, ids: Vec<String>) {
        self.by_user
            .insert(user_id.to_string(), RwLock::new(ids.into_iter().collect()));
    }

    pub fn is_warm(&self, user_id: &str) -> bool {
        self.by_user.contains_key(user_id)
    }

    pub fn insert(&self, user_id: &str, memory_id: &str) {
        let entry = self.by_user.entry(user_id.to_string()).or_default();
        entry.write().unwrap().insert(memory_id.to_string());
    }

    pub fn remove(&self, user_id: &str, memory_id: &str) {
        if let Some(entry) = self.by_user.get(user_id) {
            entry.write().unwrap().remove(memory_id);
        }
    }

    pub fn contains(&self, user_id: &str, memory_id: &str) -> Option<bool> {
        self.by_user
            .get(user_id)
            .map(|entry| entry.read().unwrap().contains(memory_id))
    }

    pub fn ids(&self, user_id: &str) -> Option<Vec<String>> {
        self.by_user
            .get(user_id)
            .map(|entry| entry.read().unwrap().iter().cloned().collect())
    }
}
