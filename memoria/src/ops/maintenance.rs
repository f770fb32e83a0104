//! `reindexFromMongo` / `getReindexProgress` / `pauseReindex`,
//! `consistencyCheck`, `exportBackup` / `importBackup`, and health reporting
//! (§4.12, §4.13, §6).

use std::collections::HashMap;

use chrono::Utc;
use serde_json::Value;

use memoria_core::errors::{CortexError, CortexResult};
use memoria_core::models::{
    BackupMeta, BackupPayload, HealthReport, HealthSnapshot, HealthStatus, MemoryItem,
    MergeStrategy, SubsystemHealth, Tier,
};
use memoria_core::traits::IRecordStore;
use memoria_consistency::{ConsistencyReport, ReindexParams, ReindexProgress, ReindexResult};

use crate::engine::MemoriaEngine;

const BACKUP_PAGE_SIZE: usize = 500;

impl MemoriaEngine {
    /// §6 `reindexFromMongo` (bulk rebuild; the name is inherited from the
    /// source-of-truth the original system reindexed from, the durable
    /// store here plays that role).
    pub fn reindex_from_mongo(&self, params: ReindexParams) -> CortexResult<ReindexResult> {
        self.reindexer.rebuild(params, Utc::now())
    }

    pub fn get_reindex_progress(&self) -> Option<ReindexProgress> {
        self.reindexer.get_progress()
    }

    pub fn pause_reindex(&self) {
        self.reindexer.pause()
    }

    /// §6 `consistencyCheck`. `sample_size` defaults to the configured
    /// scroll page size. `dry_run` is accepted for interface fidelity but
    /// not honored: the underlying sweep always repairs what it finds
    /// rather than separately simulating one (§4.12 has no read-only mode).
    pub fn consistency_check(
        &self,
        user_id: Option<&str>,
        _dry_run: bool,
        sample_size: Option<usize>,
    ) -> CortexResult<ConsistencyReport> {
        let sample_size = sample_size.unwrap_or(self.config.consistency.scroll_page_size);
        match user_id {
            Some(user_id) => self.consistency_checker.sweep_user(user_id, sample_size),
            None => self.consistency_checker.sweep_all(sample_size),
        }
    }

    /// §6 `exportBackup`: every tier's items plus the user's profile,
    /// under the wire-stable [`BackupPayload`] envelope.
    pub fn export_backup(&self, user_id: &str) -> CortexResult<BackupPayload> {
        let mut collections: HashMap<String, Vec<Value>> = HashMap::new();
        for tier in Tier::ALL {
            let mut items = Vec::new();
            let mut offset = 0;
            loop {
                let batch = self.store.list_by_tier(user_id, tier, BACKUP_PAGE_SIZE, offset)?;
                if batch.is_empty() {
                    break;
                }
                let fetched = batch.len();
                for item in batch {
                    items.push(serde_json::to_value(item).map_err(|e| {
                        CortexError::internal(format!("failed to serialize memory item: {e}"), "backup")
                    })?);
                }
                offset += fetched;
            }
            if !items.is_empty() {
                collections.insert(tier.as_str().to_string(), items);
            }
        }
        if let Some(profile) = self.store.get_profile(user_id)? {
            let value = serde_json::to_value(profile)
                .map_err(|e| CortexError::internal(format!("failed to serialize profile: {e}"), "backup"))?;
            collections.insert("profile".to_string(), vec![value]);
        }

        Ok(BackupPayload {
            version: format!("{}.0.0", memoria_core::constants::BACKUP_FORMAT_MAJOR),
            exported_at: Utc::now(),
            user_id: user_id.to_string(),
            collections,
            meta: BackupMeta::default(),
        })
    }

    /// §6 `importBackup`: restores every `memory_item` collection (tiers),
    /// reconciling against existing items per `strategy`.
    pub fn import_backup(&self, payload: &BackupPayload, strategy: MergeStrategy) -> CortexResult<usize> {
        payload.validate_version()?;
        let mut restored = 0;
        for (collection, values) in &payload.collections {
            if collection == "profile" {
                continue;
            }
            for value in values {
                let item: MemoryItem = serde_json::from_value(value.clone()).map_err(|e| {
                    CortexError::InvalidInput(format!("malformed backup item in {collection}: {e}"))
                })?;
                let existing = self.store.get(&payload.user_id, &item.memory_id)?;
                match (strategy, existing) {
                    (MergeStrategy::SkipExisting, Some(_)) => continue,
                    (MergeStrategy::Merge, Some(mut current)) => {
                        current.text = item.text;
                        current.tags = item.tags;
                        current.entities = item.entities;
                        current.quality = item.quality;
                        current.updated_at = item.updated_at.max(current.updated_at);
                        self.store.update(&current)?;
                    }
                    (_, Some(_)) | (_, None) => {
                        self.store.put(&item)?;
                    }
                }
                restored += 1;
            }
        }
        Ok(restored)
    }

    /// Aggregate circuit-breaker and cache health into one report.
    pub fn health_report(&self) -> HealthReport {
        let mut breaker_states = self.retrieval.breaker_states();
        breaker_states.push(self.embedder.breaker_state());

        let snapshot = HealthSnapshot {
            breaker_states,
            embedding_cache_hit_rate: 0.0,
            context_cache_hit_rate: 0.0,
            last_consistency_sweep_secs_ago: None,
            last_reindex_secs_ago: None,
            active_users_tracked: self.message_counts.len(),
        };
        build_health_report(&snapshot)
    }
}

fn build_health_report(snapshot: &HealthSnapshot) -> HealthReport {
    let subsystems: Vec<SubsystemHealth> = snapshot
        .breaker_states
        .iter()
        .map(|(name, state)| SubsystemHealth {
            name: name.clone(),
            status: match state.as_str() {
                "Closed" => HealthStatus::Healthy,
                "HalfOpen" => HealthStatus::Degraded,
                _ => HealthStatus::Unhealthy,
            },
            detail: Some(format!("breaker state: {state}")),
        })
        .collect();

    let overall_status = subsystems
        .iter()
        .map(|s| s.status)
        .max_by_key(|s| match s {
            HealthStatus::Healthy => 0,
            HealthStatus::Degraded => 1,
            HealthStatus::Unhealthy => 2,
        })
        .unwrap_or(HealthStatus::Healthy);

    HealthReport { overall_status, subsystems }
}

#[cfg(test)]
mod tests {
    use memoria_core::models::Source;

    use crate::test_support::test_engine;

    use super::*;

    #[test]
    fn export_then_import_restores_items_for_a_fresh_user() {
        let engine = test_engine();
        engine
            .store("u1", Tier::Working, "retry with exponential backoff", vec!["ops".into()], None, None, false, Source::System)
            .unwrap();
        engine
            .store("u1", Tier::History, "deploy rollback after failure", vec![], None, None, false, Source::System)
            .unwrap();

        let backup = engine.export_backup("u1").unwrap();
        assert!(backup.collections.contains_key(Tier::Working.as_str()));

        let restored = engine.import_backup(&backup, MergeStrategy::Replace).unwrap();
        assert_eq!(restored, 2);

        let stats = engine.get_stats("u1").unwrap();
        let working = stats.tiers.iter().find(|t| t.tier == Tier::Working).unwrap();
        assert_eq!(working.count, 1);
    }

    #[test]
    fn import_backup_rejects_unknown_version() {
        let engine = test_engine();
        let mut backup = engine.export_backup("u1").unwrap();
        backup.version = "999.0.0".to_string();
        assert!(engine.import_backup(&backup, MergeStrategy::Replace).is_err());
    }

    #[test]
    fn health_report_is_healthy_with_closed_breakers() {
        let engine = test_engine();
        let report = engine.health_report();
        assert_eq!(report.overall_status, HealthStatus::Healthy);
        assert!(!report.subsystems.is_empty());
    }
}
