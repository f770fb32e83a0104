//! `recordFeedback` / `recordOutcome` / `recordResponse` (§6, §4.7). Thin
//! delegation to `OutcomeRecorder`, which already owns the per-item locking.

use chrono::Utc;
use uuid::Uuid;

use memoria_core::errors::CortexResult;
use memoria_core::models::{MemoryItem, Outcome};

use crate::engine::MemoriaEngine;

impl MemoriaEngine {
    pub fn record_feedback(&self, user_id: &str, memory_id: &str, score: i32) -> CortexResult<()> {
        self.outcome_recorder.record_feedback(user_id, memory_id, score, Utc::now())
    }

    pub fn record_outcome(&self, user_id: &str, outcome: Outcome, related_memory_ids: &[String]) -> CortexResult<()> {
        self.outcome_recorder.record_outcome(user_id, outcome, related_memory_ids, Utc::now())
    }

    pub fn record_response(
        &self,
        user_id: &str,
        key_takeaway: &str,
        outcome: Option<Outcome>,
        related: &[String],
    ) -> CortexResult<MemoryItem> {
        let memory_id = Uuid::new_v4().to_string();
        self.outcome_recorder
            .record_response(user_id, memory_id, key_takeaway, outcome, related, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use memoria_core::models::Source;
    use memoria_core::traits::IRecordStore;

    use crate::test_support::test_engine;

    use super::*;

    #[test]
    fn record_feedback_updates_item_stats() {
        let engine = test_engine();
        let id = engine
            .store("u1", memoria_core::models::Tier::Working, "retry policy", vec![], None, None, false, Source::System)
            .unwrap();

        engine.record_feedback("u1", &id, 1).unwrap();

        let item = engine.store.get("u1", &id).unwrap().unwrap();
        assert_eq!(item.stats.uses, 1);
        assert!(item.stats.success_rate > 0.0);
    }

    #[test]
    fn record_response_creates_history_item_and_applies_outcome_to_related() {
        let engine = test_engine();
        let related_id = engine
            .store("u1", memoria_core::models::Tier::Working, "retry with backoff", vec![], None, None, false, Source::System)
            .unwrap();

        let created = engine
            .record_response("u1", "retrying with backoff resolved the timeout", Some(Outcome::Worked), &[related_id.clone()])
            .unwrap();

        assert_eq!(created.tier, memoria_core::models::Tier::History);
        let related = engine.store.get("u1", &related_id).unwrap().unwrap();
        assert_eq!(related.stats.uses, 1);
    }
}
