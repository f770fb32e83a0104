//! `ConsistencyChecker` (§4.12): durable-store/vector-index coherence
//! sweeps. The RecordStore is authoritative; every action here repairs the
//! VectorIndex towards it, never the reverse.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use memoria_core::config::ConsistencyConfig;
use memoria_core::errors::CortexResult;
use memoria_core::models::{ConsistencyEventType, ConsistencyLogEntry, Deadline, Status, Tier};
use memoria_core::traits::{IEmbedder, ILexicalIndex, IRecordStore, IVectorIndex};
use memoria_reliability::CircuitBreaker;

/// Per-sweep tally, one user at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsistencyReport {
    pub checked: u64,
    pub missing_repaired: u64,
    pub hash_mismatch_repaired: u64,
    pub orphans_deleted: u64,
    pub errors: u64,
}

impl ConsistencyReport {
    fn merge(&mut self, other: ConsistencyReport) {
        self.checked += other.checked;
        self.missing_repaired += other.missing_repaired;
        self.hash_mismatch_repaired += other.hash_mismatch_repaired;
        self.orphans_deleted += other.orphans_deleted;
        self.errors += other.errors;
    }
}

pub struct ConsistencyChecker {
    store: Arc<dyn IRecordStore>,
    vector_index: Arc<dyn IVectorIndex>,
    lexical_index: Arc<dyn ILexicalIndex>,
    embedder: Arc<dyn IEmbedder>,
    breaker: CircuitBreaker,
    config: ConsistencyConfig,
}

impl ConsistencyChecker {
    pub fn new(
        store: Arc<dyn IRecordStore>,
        vector_index: Arc<dyn IVectorIndex>,
        lexical_index: Arc<dyn ILexicalIndex>,
        embedder: Arc<dyn IEmbedder>,
        config: ConsistencyConfig,
    ) -> Self {
        Self {
            store,
            vector_index,
            lexical_index,
            embedder,
            breaker: CircuitBreaker::new("vector_index", Default::default()),
            config,
        }
    }

    pub fn with_breaker(mut self, breaker: CircuitBreaker) -> Self {
        self.breaker = breaker;
        self
    }

    /// Sweep every user the store currently tracks active items for.
    pub fn sweep_all(&self, sample_size: usize) -> CortexResult<ConsistencyReport> {
        let user_ids = self.store.list_user_ids(usize::MAX)?;
        let mut total = ConsistencyReport::default();
        for user_id in user_ids {
            match self.sweep_user(&user_id, sample_size) {
                Ok(report) => total.merge(report),
                Err(e) => {
                    total.errors += 1;
                    debug!(user_id, error = %e, "consistency sweep failed for user");
                }
            }
        }
        Ok(total)
    }

    /// Sweep one user: reconcile a RecordStore sample against the
    /// VectorIndex, then independently reconcile a VectorIndex sample
    /// against the RecordStore.
    pub fn sweep_user(&self, user_id: &str, sample_size: usize) -> CortexResult<ConsistencyReport> {
        let mut report = ConsistencyReport::default();
        self.reconcile_from_store(user_id, sample_size, &mut report);
        self.reconcile_from_index(user_id, sample_size, &mut report);
        Ok(report)
    }

    /// Side A: for each active item, the VectorIndex must hold a point whose
    /// hash matches the current text. Missing points are upserted (re-embedding
    /// if needed); stale hashes are re-embedded and re-upserted.
    fn reconcile_from_store(&self, user_id: &str, sample_size: usize, report: &mut ConsistencyReport) {
        let items = match self.store.sample_active(user_id, sample_size) {
            Ok(items) => items,
            Err(e) => {
                report.errors += 1;
                debug!(user_id, error = %e, "sample_active failed");
                return;
            }
        };

        for item in items {
            report.checked += 1;
            let present = self
                .breaker
                .call(|| self.vector_index.contains(user_id, &item.memory_id))
                .unwrap_or(false);
            let hash_current = item.embedding_is_current();

            if present && hash_current {
                continue;
            }

            let event_type = if !present {
                ConsistencyEventType::MissingVectorPoint
            } else {
                ConsistencyEventType::VectorHashMismatch
            };

            match self.reembed_and_upsert(user_id, &item.memory_id, &item.text, item.tier, item.status) {
                Ok(()) => {
                    if !present {
                        report.missing_repaired += 1;
                    } else {
                        report.hash_mismatch_repaired += 1;
                    }
                    self.log(event_type, &item.memory_id, "repaired", true);
                }
                Err(e) => {
                    report.errors += 1;
                    self.log(event_type, &item.memory_id, &e.to_string(), false);
                }
            }
        }
    }

    /// Side B: any vector point whose record is missing or non-active is an
    /// orphan and is deleted (the store is authoritative).
    fn reconcile_from_index(&self, user_id: &str, sample_size: usize, report: &mut ConsistencyReport) {
        let (ids, _cursor) = match self.vector_index.scroll(user_id, None, sample_size) {
            Ok(page) => page,
            Err(e) => {
                report.errors += 1;
                debug!(user_id, error = %e, "vector scroll failed");
                return;
            }
        };

        for memory_id in ids {
            let record = match self.store.get(user_id, &memory_id) {
                Ok(r) => r,
                Err(e) => {
                    report.errors += 1;
                    debug!(user_id, memory_id, error = %e, "record lookup failed during orphan scan");
                    continue;
                }
            };
            let orphan = match &record {
                None => true,
                Some(item) => !item.is_active(),
            };
            if !orphan {
                continue;
            }
            match self.vector_index.delete(user_id, &memory_id) {
                Ok(()) => {
                    report.orphans_deleted += 1;
                    self.log(ConsistencyEventType::OrphanVectorPoint, &memory_id, "deleted", true);
                }
                Err(e) => {
                    report.errors += 1;
                    self.log(ConsistencyEventType::OrphanVectorPoint, &memory_id, &e.to_string(), false);
                }
            }
            if let Err(e) = self.lexical_index.remove(user_id, &memory_id) {
                debug!(user_id, memory_id, error = %e, "failed to drop lexical entry for orphan");
            }
        }
    }

    fn reembed_and_upsert(
        &self,
        user_id: &str,
        memory_id: &str,
        text: &str,
        tier: Tier,
        status: Status,
    ) -> CortexResult<()> {
        let deadline = Deadline::after(std::time::Duration::from_secs(10));
        let vector = self.embedder.embed(text, deadline)?;
        self.vector_index.upsert(user_id, memory_id, &vector, tier, status)
    }

    fn log(&self, event_type: ConsistencyEventType, memory_id: &str, details: &str, repaired: bool) {
        let entry = ConsistencyLogEntry {
            event_type,
            memory_id: memory_id.to_string(),
            details: details.to_string(),
            repaired,
            logged_at: Utc::now(),
        };
        if let Err(e) = self.store.log_consistency_event(&entry) {
            debug!(memory_id, error = %e, "failed to write consistency log entry");
        }
    }

    pub fn warmup_secs(&self) -> u64 {
        self.config.warmup_secs
    }

    pub fn sweep_interval_secs(&self) -> u64 {
        self.config.sweep_interval_secs
    }
}
