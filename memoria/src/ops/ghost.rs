//! `ghostMemory` / `restoreMemory` / `isMemoryGhosted` / `getGhostedMemories`
//! (§4.10, §6), plus the facade-composed `filterGhosted` and `clearByTier`.
//!
//! The `ghosts` table has no tier column, so `clearByTier` has to join each
//! ghost id against the item it shadows to learn its tier.

use memoria_core::errors::CortexResult;
use memoria_core::models::Tier;
use memoria_core::traits::IRecordStore;

use crate::engine::MemoriaEngine;

impl MemoriaEngine {
    pub fn ghost_memory(&self, user_id: &str, memory_id: &str) -> CortexResult<()> {
        self.store.mark_ghost(user_id, memory_id)
    }

    pub fn restore_memory(&self, user_id: &str, memory_id: &str) -> CortexResult<()> {
        self.store.unmark_ghost(user_id, memory_id)
    }

    pub fn is_memory_ghosted(&self, user_id: &str, memory_id: &str) -> CortexResult<bool> {
        self.store.is_ghost(user_id, memory_id)
    }

    pub fn get_ghosted_memories(&self, user_id: &str) -> CortexResult<Vec<String>> {
        self.store.ghost_ids(user_id)
    }

    /// Drops every ghosted id from `ids`, returning only the ones still visible.
    pub fn filter_ghosted(&self, user_id: &str, ids: &[String]) -> CortexResult<Vec<String>> {
        let ghosted = self.store.ghost_ids(user_id)?;
        Ok(ids.iter().filter(|id| !ghosted.contains(id)).cloned().collect())
    }

    /// Un-ghosts every memory of `tier` currently ghosted for `user_id`.
    pub fn clear_by_tier(&self, user_id: &str, tier: Tier) -> CortexResult<usize> {
        let ghosted = self.store.ghost_ids(user_id)?;
        let mut cleared = 0;
        for memory_id in ghosted {
            if let Some(item) = self.store.get(user_id, &memory_id)? {
                if item.tier == tier {
                    self.store.unmark_ghost(user_id, &memory_id)?;
                    cleared += 1;
                }
            }
        }
        Ok(cleared)
    }
}

#[cfg(test)]
mod tests {
    use memoria_core::models::{Source, Tier};

    use crate::test_support::test_engine;

    #[test]
    fn ghost_then_restore_round_trips() {
        let engine = test_engine();
        let id = engine.store("u1", Tier::Working, "a memory", vec![], None, None, false, Source::System).unwrap();

        assert!(!engine.is_memory_ghosted("u1", &id).unwrap());
        engine.ghost_memory("u1", &id).unwrap();
        assert!(engine.is_memory_ghosted("u1", &id).unwrap());
        assert_eq!(engine.get_ghosted_memories("u1").unwrap(), vec![id.clone()]);

        engine.restore_memory("u1", &id).unwrap();
        assert!(!engine.is_memory_ghosted("u1", &id).unwrap());
    }

    #[test]
    fn filter_ghosted_drops_only_ghosted_ids() {
        let engine = test_engine();
        let a = engine.store("u1", Tier::Working, "memory a", vec![], None, None, false, Source::System).unwrap();
        let b = engine.store("u1", Tier::Working, "memory b", vec![], None, None, false, Source::System).unwrap();
        engine.ghost_memory("u1", &a).unwrap();

        let visible = engine.filter_ghosted("u1", &[a, b.clone()]).unwrap();
        assert_eq!(visible, vec![b]);
    }

    #[test]
    fn clear_by_tier_only_restores_matching_tier() {
        let engine = test_engine();
        let working = engine.store("u1", Tier::Working, "w", vec![], None, None, false, Source::System).unwrap();
        let history = engine.store("u1", Tier::History, "h", vec![], None, None, false, Source::System).unwrap();
        engine.ghost_memory("u1", &working).unwrap();
        engine.ghost_memory("u1", &history).unwrap();

        let cleared = engine.clear_by_tier("u1", Tier::Working).unwrap();
        assert_eq!(cleared, 1);
        assert!(!engine.is_memory_ghosted("u1", &working).unwrap());
        assert!(engine.is_memory_ghosted("u1", &history).unwrap());
    }
}
