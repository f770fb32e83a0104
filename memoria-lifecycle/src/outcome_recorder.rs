//! `OutcomeRecorder` (§4.7): applies feedback/outcome events to items under
//! the per-item lock, atomically updating `uses`, the outcome counters,
//! `success_rate`, and `wilson_score`.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use memoria_core::errors::{CortexError, CortexResult};
use memoria_core::models::{MemoryItem, Outcome, OutcomeEvent, Source, Tier};
use memoria_core::traits::IRecordStore;

use crate::item_lock::ItemLocks;

pub struct OutcomeRecorder {
    store: Arc<dyn IRecordStore>,
    locks: Arc<ItemLocks>,
}

impl OutcomeRecorder {
    pub fn new(store: Arc<dyn IRecordStore>, locks: Arc<ItemLocks>) -> Self {
        Self { store, locks }
    }

    /// `recordFeedback`: map a `{-1, 0, 1}` score to an outcome and apply it.
    pub fn record_feedback(
        &self,
        user_id: &str,
        memory_id: &str,
        score: i32,
        now: DateTime<Utc>,
    ) -> CortexResult<()> {
        self.apply_outcome(user_id, memory_id, Outcome::from_feedback_score(score), now)
    }

    /// `recordOutcome`: apply one outcome across every related item.
    pub fn record_outcome(
        &self,
        user_id: &str,
        outcome: Outcome,
        related_memory_ids: &[String],
        now: DateTime<Utc>,
    ) -> CortexResult<()> {
        for memory_id in related_memory_ids {
            self.apply_outcome(user_id, memory_id, outcome, now)?;
        }
        Ok(())
    }

    /// `recordResponse`: create a new `history`-tier item carrying
    /// `key_takeaway`, optionally applying an outcome to it and to any
    /// other related items.
    pub fn record_response(
        &self,
        user_id: &str,
        memory_id: impl Into<String>,
        key_takeaway: impl Into<String>,
        outcome: Option<Outcome>,
        related: &[String],
        now: DateTime<Utc>,
    ) -> CortexResult<MemoryItem> {
        let memory_id = memory_id.into();
        let mut item = MemoryItem::new(
            memory_id.clone(),
            user_id,
            Tier::History,
            key_takeaway,
            Source::Assistant { conversation_id: String::new(), message_id: None },
            now,
        );
        if let Some(outcome) = outcome {
            item.apply_outcome(outcome, now);
        }
        self.store.put(&item)?;

        if let Some(outcome) = outcome {
            self.record_outcome(user_id, outcome, related, now)?;
        }
        Ok(item)
    }

    fn apply_outcome(
        &self,
        user_id: &str,
        memory_id: &str,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> CortexResult<()> {
        self.locks.with_lock(memory_id, || {
            let Some(mut item) = self.store.get(user_id, memory_id)? else {
                return Err(CortexError::NotFound(format!("memory_id: {memory_id}")));
            };
            item.apply_outcome(outcome, now);
            self.store.update(&item)?;
            self.store.record_outcome(&OutcomeEvent {
                memory_id: memory_id.to_string(),
                user_id: user_id.to_string(),
                outcome,
                related_memory_ids: Vec::new(),
                recorded_at: now,
            })?;
            debug!(memory_id, ?outcome, wilson = item.stats.wilson_score, "outcome recorded");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoria_core::models::Quality;
    use memoria_storage::StorageEngine;

    fn recorder() -> (OutcomeRecorder, Arc<StorageEngine>) {
        let store = Arc::new(StorageEngine::open_in_memory().unwrap());
        let locks = Arc::new(ItemLocks::new());
        (OutcomeRecorder::new(store.clone(), locks), store)
    }

    fn seed(store: &StorageEngine, user_id: &str, memory_id: &str) {
        let now = Utc::now();
        let mut item = MemoryItem::new(
            memory_id,
            user_id,
            Tier::Working,
            "did the thing work",
            Source::User { conversation_id: "c1".into(), message_id: None },
            now,
        );
        item.quality = Quality::new(0.5, 0.5);
        store.put(&item).unwrap();
    }

    #[test]
    fn feedback_score_one_counts_as_worked() {
        let (recorder, store) = recorder();
        seed(&store, "u1", "m1");
        recorder.record_feedback("u1", "m1", 1, Utc::now()).unwrap();
        let item = store.get("u1", "m1").unwrap().unwrap();
        assert_eq!(item.stats.worked_count, 1);
        assert_eq!(item.stats.uses, 1);
    }

    #[test]
    fn feedback_score_negative_one_counts_as_failed() {
        let (recorder, store) = recorder();
        seed(&store, "u1", "m1");
        recorder.record_feedback("u1", "m1", -1, Utc::now()).unwrap();
        let item = store.get("u1", "m1").unwrap().unwrap();
        assert_eq!(item.stats.failed_count, 1);
    }

    #[test]
    fn missing_item_is_not_found() {
        let (recorder, _store) = recorder();
        let result = recorder.record_feedback("u1", "ghost", 1, Utc::now());
        assert!(matches!(result, Err(CortexError::NotFound(_))));
    }

    #[test]
    fn record_response_creates_a_history_item() {
        let (recorder, _store) = recorder();
        let item = recorder
            .record_response("u1", "m2", "retrying with backoff worked", Some(Outcome::Worked), &[], Utc::now())
            .unwrap();
        assert_eq!(item.tier, Tier::History);
        assert_eq!(item.stats.worked_count, 1);
    }
}
