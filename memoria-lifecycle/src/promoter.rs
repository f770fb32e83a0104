//! `Promoter` (§4.8): periodic and trigger-hook tier transitions. Runs under
//! the same per-item locks as `OutcomeRecorder` and re-reads each item after
//! acquiring its lock, so a promotion never races a concurrent outcome
//! update (§5).

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::debug;

use memoria_core::config::LifecycleConfig;
use memoria_core::errors::CortexResult;
use memoria_core::models::{MemoryItem, Status, Tier};
use memoria_core::traits::{ILexicalIndex, IRecordStore, IVectorIndex};

use crate::item_lock::ItemLocks;

const PROMOTION_BATCH_SIZE: usize = 200;

/// Result of evaluating the transition ladder against one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    PromotedTo(Tier),
    Archived,
    None,
}

/// Per-cycle counters (§4.8: "exposed to callers and usable for
/// cache_hit_rate/promotion_rate reporting").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromotionStats {
    pub promoted: u64,
    pub archived: u64,
    pub deleted: u64,
    pub errors: u64,
    pub duration_ms: u64,
}

pub struct Promoter {
    store: Arc<dyn IRecordStore>,
    vector_index: Arc<dyn IVectorIndex>,
    lexical_index: Arc<dyn ILexicalIndex>,
    locks: Arc<ItemLocks>,
    #[allow(dead_code)]
    config: LifecycleConfig,
}

impl Promoter {
    pub fn new(
        store: Arc<dyn IRecordStore>,
        vector_index: Arc<dyn IVectorIndex>,
        lexical_index: Arc<dyn ILexicalIndex>,
        locks: Arc<ItemLocks>,
        config: LifecycleConfig,
    ) -> Self {
        Self { store, vector_index, lexical_index, locks, config }
    }

    /// Run one promotion cycle for `user_id`, sweeping the three
    /// promotion-eligible tiers (`working`, `history`, `patterns`).
    pub fn run_cycle(&self, user_id: &str, now: DateTime<Utc>) -> CortexResult<PromotionStats> {
        let start = Instant::now();
        let mut stats = PromotionStats::default();

        for tier in Tier::TTL_TIERS {
            let mut offset = 0;
            loop {
                let batch = self.store.list_by_tier(user_id, tier, PROMOTION_BATCH_SIZE, offset)?;
                if batch.is_empty() {
                    break;
                }
                let fetched = batch.len();
                for item in &batch {
                    match self.promote_one(user_id, &item.memory_id, now) {
                        Ok(Transition::PromotedTo(_)) => stats.promoted += 1,
                        Ok(Transition::Archived) => stats.archived += 1,
                        Ok(Transition::None) => {}
                        Err(e) => {
                            stats.errors += 1;
                            debug!(memory_id = %item.memory_id, error = %e, "promotion cycle error");
                        }
                    }
                }
                offset += fetched;
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok(stats)
    }

    /// Re-read `memory_id` under its lock and apply the first matching
    /// transition in the ladder order (§4.8: "an item that transitions is
    /// not considered again in the same cycle").
    fn promote_one(&self, user_id: &str, memory_id: &str, now: DateTime<Utc>) -> CortexResult<Transition> {
        self.locks.with_lock(memory_id, || {
            let Some(mut item) = self.store.get(user_id, memory_id)? else {
                return Ok(Transition::None);
            };
            if !item.tier.is_promotion_eligible() {
                return Ok(Transition::None);
            }

            let transition = evaluate_transition(&item, now);
            match transition {
                Transition::PromotedTo(target) => {
                    item.tier = target;
                    item.expires_at = target.default_ttl_days().map(|days| now + chrono::Duration::days(days));
                    item.updated_at = now;
                    self.store.update(&item)?;
                }
                Transition::Archived => {
                    item.status = Status::Archived;
                    item.archived_at = Some(now);
                    item.updated_at = now;
                    self.store.update(&item)?;
                    // Best-effort: an archived item is no longer retrievable
                    // regardless, the periodic consistency sweep repairs a
                    // missed delete here (§4.12).
                    if let Err(e) = self.vector_index.delete(user_id, memory_id) {
                        debug!(memory_id, error = %e, "failed to drop vector point for archived item");
                    }
                    if let Err(e) = self.lexical_index.remove(user_id, memory_id) {
                        debug!(memory_id, error = %e, "failed to drop lexical entry for archived item");
                    }
                }
                Transition::None => {}
            }
            Ok(transition)
        })
    }
}

fn evaluate_transition(item: &MemoryItem, now: DateTime<Utc>) -> Transition {
    let wilson = item.stats.wilson_score;
    let uses = item.stats.uses;

    if item.tier == Tier::Working && wilson >= 0.7 && uses >= 2 {
        return Transition::PromotedTo(Tier::History);
    }
    if item.tier == Tier::History && wilson >= 0.9 && uses >= 3 {
        return Transition::PromotedTo(Tier::Patterns);
    }
    if item.status.is_retrievable() && wilson < 0.2 && uses >= 2 {
        return Transition::Archived;
    }
    if item.status.is_retrievable() {
        if let Some(expires_at) = item.expires_at {
            if expires_at < now {
                return Transition::Archived;
            }
        }
    }
    Transition::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoria_core::errors::CortexResult;
    use memoria_core::models::{Outcome, Quality, Source};
    use memoria_storage::StorageEngine;

    /// No-op vector index: the promoter tests only care about store-side
    /// transitions, not vector point cleanup (covered in `memoria-vector`).
    struct NullVectorIndex;
    impl IVectorIndex for NullVectorIndex {
        fn ensure_schema(&self, _dims: usize) -> CortexResult<()> {
            Ok(())
        }
        fn upsert(&self, _: &str, _: &str, _: &[f32], _: Tier, _: Status) -> CortexResult<()> {
            Ok(())
        }
        fn upsert_batch(&self, _: &str, points: &[(String, Vec<f32>, Tier, Status)]) -> CortexResult<usize> {
            Ok(points.len())
        }
        fn search(&self, _: &str, _: &[f32], _: usize, _: Option<&[String]>) -> CortexResult<Vec<(String, f64)>> {
            Ok(Vec::new())
        }
        fn filter_by_entities(&self, _: &str, _: &[String], _: usize) -> CortexResult<Vec<String>> {
            Ok(Vec::new())
        }
        fn delete(&self, _: &str, _: &str) -> CortexResult<()> {
            Ok(())
        }
        fn delete_by_filter(&self, _: &str, _: Option<Tier>, _: Option<Status>) -> CortexResult<usize> {
            Ok(0)
        }
        fn scroll(&self, _: &str, _: Option<&str>, _: usize) -> CortexResult<(Vec<String>, Option<String>)> {
            Ok((Vec::new(), None))
        }
        fn contains(&self, _: &str, _: &str) -> CortexResult<bool> {
            Ok(false)
        }
    }

    struct NullLexicalIndex;
    impl ILexicalIndex for NullLexicalIndex {
        fn score(&self, _: &str, _: &str, _: usize) -> CortexResult<Vec<(String, f64)>> {
            Ok(Vec::new())
        }
        fn index(&self, _: &str, _: &str, _: &str) -> CortexResult<()> {
            Ok(())
        }
        fn remove(&self, _: &str, _: &str) -> CortexResult<()> {
            Ok(())
        }
        fn invalidate_user(&self, _: &str) -> CortexResult<()> {
            Ok(())
        }
    }

    fn seed(store: &StorageEngine, user_id: &str, memory_id: &str, tier: Tier, worked: u64, failed: u64) {
        let now = Utc::now();
        let mut item = MemoryItem::new(
            memory_id,
            user_id,
            tier,
            "some memory text",
            Source::User { conversation_id: "c1".into(), message_id: None },
            now,
        );
        item.quality = Quality::new(0.5, 0.5);
        for _ in 0..worked {
            item.apply_outcome(Outcome::Worked, now);
        }
        for _ in 0..failed {
            item.apply_outcome(Outcome::Failed, now);
        }
        store.put(&item).unwrap();
    }

    fn promoter() -> (Promoter, Arc<StorageEngine>) {
        let store = Arc::new(StorageEngine::open_in_memory().unwrap());
        let vector_index: Arc<dyn IVectorIndex> = Arc::new(NullVectorIndex);
        let lexical_index: Arc<dyn ILexicalIndex> = Arc::new(NullLexicalIndex);
        let locks = Arc::new(ItemLocks::new());
        (
            Promoter::new(store.clone(), vector_index, lexical_index, locks, LifecycleConfig::default()),
            store,
        )
    }

    #[test]
    fn proven_working_item_promotes_to_history() {
        let (promoter, store) = promoter();
        // 14 worked / 1 failed clears the 0.7 threshold (see wilson.rs tests).
        seed(&store, "u1", "m1", Tier::Working, 14, 1);
        let stats = promoter.run_cycle("u1", Utc::now()).unwrap();
        assert_eq!(stats.promoted, 1);
        let item = store.get("u1", "m1").unwrap().unwrap();
        assert_eq!(item.tier, Tier::History);
        assert!(item.expires_at.is_some());
    }

    #[test]
    fn unproven_item_is_untouched() {
        let (promoter, store) = promoter();
        seed(&store, "u1", "m1", Tier::Working, 0, 0);
        let stats = promoter.run_cycle("u1", Utc::now()).unwrap();
        assert_eq!(stats.promoted, 0);
        assert_eq!(stats.archived, 0);
        let item = store.get("u1", "m1").unwrap().unwrap();
        assert_eq!(item.tier, Tier::Working);
    }

    #[test]
    fn consistently_failing_item_is_garbage_archived() {
        let (promoter, store) = promoter();
        seed(&store, "u1", "m1", Tier::Working, 0, 5);
        let stats = promoter.run_cycle("u1", Utc::now()).unwrap();
        assert_eq!(stats.archived, 1);
        let item = store.get("u1", "m1").unwrap().unwrap();
        assert_eq!(item.status, Status::Archived);
    }

    #[test]
    fn memory_bank_tier_is_never_touched() {
        let (promoter, store) = promoter();
        seed(&store, "u1", "m1", Tier::MemoryBank, 0, 5);
        let stats = promoter.run_cycle("u1", Utc::now()).unwrap();
        assert_eq!(stats.promoted, 0);
        assert_eq!(stats.archived, 0);
        let item = store.get("u1", "m1").unwrap().unwrap();
        assert_eq!(item.tier, Tier::MemoryBank);
        assert_eq!(item.status, Status::Active);
    }
}
