//! `Reindexer` (§4.13): bulk vector rebuilds, deferred catch-up, and
//! corrupted-content sanitization. Single-flight: only one `rebuild` or
//! `reindex_deferred` job runs at a time; a second call while one is active
//! is refused with the active job's id rather than queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;

use memoria_core::errors::{CortexError, CortexResult};
use memoria_core::models::{Deadline, EmbeddingInfo, MemoryItem, ReindexCheckpoint, Status, Tier};
use memoria_core::traits::{IEmbedder, IRecordStore, IVectorIndex};

const DEFERRED_BATCH_SIZE: usize = 200;
const SANITIZE_BATCH_SIZE: usize = 500;
/// Rounds of an all-empty-after-filter deferred batch before giving up, so a
/// `user_id` filter against a queue dominated by other users' flagged items
/// cannot spin forever.
const DEFERRED_STALE_ROUNDS_LIMIT: u32 = 3;

#[derive(Debug, Clone)]
pub struct ReindexParams {
    pub user_id: Option<String>,
    pub tier: Option<Tier>,
    pub since: Option<DateTime<Utc>>,
    pub batch_size: usize,
    pub concurrency: usize,
    pub resume_from_checkpoint: Option<String>,
}

impl Default for ReindexParams {
    fn default() -> Self {
        Self {
            user_id: None,
            tier: None,
            since: None,
            batch_size: 200,
            concurrency: memoria_core::constants::DEFAULT_REINDEX_CONCURRENCY,
            resume_from_checkpoint: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReindexResult {
    pub job_id: String,
    pub processed: u64,
    pub total: Option<u64>,
    pub errors: u64,
    pub duration_ms: u64,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReindexProgress {
    pub job_id: String,
    pub processed: u64,
    pub total: Option<u64>,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanitizeResult {
    pub scanned: u64,
    pub sanitized: u64,
}

pub struct Reindexer {
    store: Arc<dyn IRecordStore>,
    vector_index: Arc<dyn IVectorIndex>,
    embedder: Arc<dyn IEmbedder>,
    active_job: Mutex<Option<String>>,
    paused: AtomicBool,
    progress: Mutex<Option<ReindexProgress>>,
    corrupted_pattern: Regex,
}

impl Reindexer {
    pub fn new(
        store: Arc<dyn IRecordStore>,
        vector_index: Arc<dyn IVectorIndex>,
        embedder: Arc<dyn IEmbedder>,
    ) -> Self {
        Self {
            store,
            vector_index,
            embedder,
            active_job: Mutex::new(None),
            paused: AtomicBool::new(false),
            progress: Mutex::new(None),
            corrupted_pattern: Regex::new(r"(?:data:[\w/+.-]+;base64,)?[A-Za-z0-9+/]{80,}={0,2}")
                .expect("static pattern"),
        }
    }

    /// `rebuild`: re-embed and re-upsert every item matching the filters,
    /// checkpointing after each batch so a crash mid-job resumes cleanly.
    pub fn rebuild(&self, params: ReindexParams, now: DateTime<Utc>) -> CortexResult<ReindexResult> {
        let job_id = self.begin(params.resume_from_checkpoint.clone())?;
        let outcome = self.run_rebuild(&job_id, &params, now);
        self.end();
        outcome
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn get_progress(&self) -> Option<ReindexProgress> {
        self.progress.lock().unwrap().clone()
    }

    /// `reindexDeferred`: drain items flagged `needs_reindex=true`, clearing
    /// the flag as each succeeds.
    pub fn reindex_deferred(&self, user_id: Option<&str>, now: DateTime<Utc>) -> CortexResult<ReindexResult> {
        let job_id = self.begin(None)?;
        let outcome = self.run_reindex_deferred(&job_id, user_id, now);
        self.end();
        outcome
    }

    /// `sanitizeCorruptedContent`: strip suspected base64/binary fragments
    /// from `text`, preserving the original in `sanitized_backup`.
    pub fn sanitize_corrupted_content(
        &self,
        user_id: Option<&str>,
        tier: Option<Tier>,
        dry_run: bool,
        now: DateTime<Utc>,
    ) -> CortexResult<SanitizeResult> {
        let mut result = SanitizeResult::default();
        for (user_id, tier) in self.enumerate_targets(user_id, tier)? {
            let mut offset = 0;
            loop {
                let batch = self.store.list_by_tier(&user_id, tier, SANITIZE_BATCH_SIZE, offset)?;
                if batch.is_empty() {
                    break;
                }
                let fetched = batch.len();
                for item in batch {
                    result.scanned += 1;
                    if let Some(clean) = self.sanitize_text(&item.text) {
                        result.sanitized += 1;
                        if !dry_run {
                            let mut updated = item.clone();
                            updated.sanitized_backup = Some(item.text.clone());
                            updated.mark_text_updated(clean, now);
                            self.store.update(&updated)?;
                        }
                    }
                }
                offset += fetched;
            }
        }
        Ok(result)
    }

    /// `countCorruptedContent`: same scan as sanitization, without mutating.
    pub fn count_corrupted_content(&self, user_id: Option<&str>, tier: Option<Tier>) -> CortexResult<u64> {
        let mut count = 0u64;
        for (user_id, tier) in self.enumerate_targets(user_id, tier)? {
            let mut offset = 0;
            loop {
                let batch = self.store.list_by_tier(&user_id, tier, SANITIZE_BATCH_SIZE, offset)?;
                if batch.is_empty() {
                    break;
                }
                let fetched = batch.len();
                count += batch.iter().filter(|i| self.corrupted_pattern.is_match(&i.text)).count() as u64;
                offset += fetched;
            }
        }
        Ok(count)
    }

    fn begin(&self, resume_job_id: Option<String>) -> CortexResult<String> {
        let mut guard = self.active_job.lock().unwrap();
        if let Some(active) = guard.as_ref() {
            return Err(CortexError::Conflict(format!("reindex job already active: {active}")));
        }
        let job_id = resume_job_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        *guard = Some(job_id.clone());
        self.paused.store(false, Ordering::SeqCst);
        Ok(job_id)
    }

    fn end(&self) {
        *self.active_job.lock().unwrap() = None;
    }

    fn run_rebuild(&self, job_id: &str, params: &ReindexParams, now: DateTime<Utc>) -> CortexResult<ReindexResult> {
        let start = Instant::now();
        let tiers: Vec<Tier> = match params.tier {
            Some(t) => vec![t],
            None => Tier::ALL.to_vec(),
        };
        let users: Vec<String> = match &params.user_id {
            Some(u) => vec![u.clone()],
            None => self.store.list_user_ids(usize::MAX)?,
        };

        let mut total = 0u64;
        for user_id in &users {
            for (tier, count) in self.store.count_by_tier(user_id)? {
                if tiers.contains(&tier) {
                    total += count as u64;
                }
            }
        }

        let mut checkpoint = if params.resume_from_checkpoint.is_some() {
            self.store
                .load_checkpoint(job_id)?
                .unwrap_or_else(|| ReindexCheckpoint::new(job_id, now))
        } else {
            ReindexCheckpoint::new(job_id, now)
        };
        checkpoint.user_id = params.user_id.clone();
        checkpoint.tier = params.tier.map(|t| t.as_str().to_string());
        checkpoint.total = Some(total);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(params.concurrency.max(1))
            .build()
            .map_err(|e| CortexError::internal(e.to_string(), "reindex"))?;

        let mut processed = checkpoint.processed;
        let mut errors = 0u64;
        let mut completed = true;

        self.set_progress(job_id, processed, checkpoint.total, true);

        'combos: for user_id in &users {
            for &tier in &tiers {
                let mut offset = 0;
                loop {
                    if self.paused.load(Ordering::SeqCst) {
                        completed = false;
                        break 'combos;
                    }
                    let batch = self.store.list_by_tier(user_id, tier, params.batch_size, offset)?;
                    if batch.is_empty() {
                        break;
                    }
                    let fetched = batch.len();
                    let batch: Vec<MemoryItem> = match params.since {
                        Some(since) => batch.into_iter().filter(|i| i.updated_at >= since).collect(),
                        None => batch,
                    };

                    let results: Vec<CortexResult<()>> =
                        pool.install(|| batch.iter().map(|item| self.reindex_one(item, now)).collect());
                    let last_id = batch.last().map(|i| i.memory_id.clone());
                    for r in results {
                        match r {
                            Ok(()) => processed += 1,
                            Err(e) => {
                                errors += 1;
                                debug!(error = %e, "reindex batch item failed");
                            }
                        }
                    }

                    checkpoint.processed = processed;
                    checkpoint.last_memory_id = last_id;
                    checkpoint.updated_at = now;
                    self.store.save_checkpoint(&checkpoint)?;
                    self.set_progress(job_id, processed, checkpoint.total, true);

                    offset += fetched;
                }
            }
        }

        if completed {
            self.store.clear_checkpoint(job_id)?;
        }
        self.set_progress(job_id, processed, checkpoint.total, false);

        Ok(ReindexResult {
            job_id: job_id.to_string(),
            processed,
            total: checkpoint.total,
            errors,
            duration_ms: start.elapsed().as_millis() as u64,
            completed,
        })
    }

    fn run_reindex_deferred(&self, job_id: &str, user_id: Option<&str>, now: DateTime<Utc>) -> CortexResult<ReindexResult> {
        let start = Instant::now();
        let mut processed = 0u64;
        let mut errors = 0u64;
        let mut stale_rounds = 0u32;

        loop {
            if self.paused.load(Ordering::SeqCst) {
                break;
            }
            let raw = self.store.list_needing_reindex(DEFERRED_BATCH_SIZE)?;
            if raw.is_empty() {
                break;
            }
            let matched: Vec<MemoryItem> = match user_id {
                Some(u) => raw.into_iter().filter(|i| i.user_id == u).collect(),
                None => raw,
            };
            if matched.is_empty() {
                stale_rounds += 1;
                if stale_rounds >= DEFERRED_STALE_ROUNDS_LIMIT {
                    break;
                }
                continue;
            }
            stale_rounds = 0;

            for item in &matched {
                match self.reindex_one(item, now) {
                    Ok(()) => processed += 1,
                    Err(e) => {
                        errors += 1;
                        debug!(memory_id = %item.memory_id, error = %e, "deferred reindex item failed");
                    }
                }
            }
            self.set_progress(job_id, processed, None, true);
        }

        self.set_progress(job_id, processed, None, false);
        Ok(ReindexResult {
            job_id: job_id.to_string(),
            processed,
            total: None,
            errors,
            duration_ms: start.elapsed().as_millis() as u64,
            completed: !self.paused.load(Ordering::SeqCst),
        })
    }

    fn reindex_one(&self, item: &MemoryItem, now: DateTime<Utc>) -> CortexResult<()> {
        let deadline = Deadline::after(Duration::from_secs(10));
        let vector = self.embedder.embed(&item.text, deadline)?;
        self.vector_index
            .upsert(&item.user_id, &item.memory_id, &vector, item.tier, item.status)?;

        let mut updated = item.clone();
        updated.embedding = Some(EmbeddingInfo {
            model: self.embedder.model_name().to_string(),
            dims: vector.len(),
            vector_hash: EmbeddingInfo::hash_text(&item.text),
            last_indexed_at: now,
        });
        updated.needs_reindex = false;
        updated.reindex_reason = None;
        updated.updated_at = now;
        self.store.update(&updated)
    }

    fn enumerate_targets(&self, user_id: Option<&str>, tier: Option<Tier>) -> CortexResult<Vec<(String, Tier)>> {
        let tiers: Vec<Tier> = match tier {
            Some(t) => vec![t],
            None => Tier::ALL.to_vec(),
        };
        let users: Vec<String> = match user_id {
            Some(u) => vec![u.to_string()],
            None => self.store.list_user_ids(usize::MAX)?,
        };
        let mut combos = Vec::with_capacity(users.len() * tiers.len());
        for u in users {
            for &t in &tiers {
                combos.push((u.clone(), t));
            }
        }
        Ok(combos)
    }

    fn sanitize_text(&self, text: &str) -> Option<String> {
        if self.corrupted_pattern.is_match(text) {
            Some(self.corrupted_pattern.replace_all(text, "[redacted]").to_string())
        } else {
            None
        }
    }

    fn set_progress(&self, job_id: &str, processed: u64, total: Option<u64>, active: bool) {
        *self.progress.lock().unwrap() = Some(ReindexProgress {
            job_id: job_id.to_string(),
            processed,
            total,
            active,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoria_core::models::{MemoryItem, Source};
    use memoria_storage::StorageEngine;
    use memoria_vector::InMemoryVectorIndex;

    struct ConstEmbedder;
    impl IEmbedder for ConstEmbedder {
        fn embed(&self, text: &str, _deadline: Deadline) -> CortexResult<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }
        fn embed_batch(&self, texts: &[String], deadline: Deadline) -> CortexResult<Vec<Vec<f32>>> {
            texts.iter().map(|t| self.embed(t, deadline)).collect()
        }
        fn dimensions(&self) -> usize {
            2
        }
        fn model_name(&self) -> &str {
            "const-test"
        }
    }

    fn reindexer() -> (Reindexer, Arc<StorageEngine>, Arc<InMemoryVectorIndex>) {
        let store = Arc::new(StorageEngine::open_in_memory().unwrap());
        let index = Arc::new(InMemoryVectorIndex::new());
        let embedder: Arc<dyn IEmbedder> = Arc::new(ConstEmbedder);
        let reindexer = Reindexer::new(store.clone(), index.clone() as Arc<dyn IVectorIndex>, embedder);
        (reindexer, store, index)
    }

    fn seed(store: &StorageEngine, user_id: &str, memory_id: &str, text: &str) {
        let item = MemoryItem::new(
            memory_id,
            user_id,
            Tier::Working,
            text,
            Source::User { conversation_id: "c1".into(), message_id: None },
            Utc::now(),
        );
        store.put(&item).unwrap();
    }

    #[test]
    fn rebuild_embeds_and_upserts_every_matching_item() {
        let (reindexer, store, index) = reindexer();
        seed(&store, "u1", "m1", "alpha");
        seed(&store, "u1", "m2", "beta");

        let params = ReindexParams { user_id: Some("u1".into()), tier: Some(Tier::Working), ..Default::default() };
        let result = reindexer.rebuild(params, Utc::now()).unwrap();

        assert_eq!(result.processed, 2);
        assert_eq!(result.errors, 0);
        assert!(result.completed);
        assert!(index.contains("u1", "m1").unwrap());
        assert!(index.contains("u1", "m2").unwrap());

        let item = store.get("u1", "m1").unwrap().unwrap();
        assert!(!item.needs_reindex);
        assert!(item.embedding.is_some());
    }

    #[test]
    fn concurrent_rebuild_is_refused() {
        let (reindexer, store, _index) = reindexer();
        seed(&store, "u1", "m1", "alpha");
        *reindexer.active_job.lock().unwrap() = Some("already-running".to_string());

        let params = ReindexParams::default();
        let err = reindexer.rebuild(params, Utc::now()).unwrap_err();
        assert!(matches!(err, CortexError::Conflict(_)));
    }

    #[test]
    fn reindex_deferred_clears_the_flag() {
        let (reindexer, store, _index) = reindexer();
        seed(&store, "u1", "m1", "needs a vector");

        let result = reindexer.reindex_deferred(Some("u1"), Utc::now()).unwrap();
        assert_eq!(result.processed, 1);
        let item = store.get("u1", "m1").unwrap().unwrap();
        assert!(!item.needs_reindex);
    }

    #[test]
    fn sanitize_strips_long_base64_fragments_and_preserves_backup() {
        let (reindexer, store, _index) = reindexer();
        let payload = "A".repeat(120);
        let text = format!("see attachment: {payload}");
        seed(&store, "u1", "m1", &text);

        let result = reindexer
            .sanitize_corrupted_content(Some("u1"), Some(Tier::Working), false, Utc::now())
            .unwrap();
        assert_eq!(result.sanitized, 1);

        let item = store.get("u1", "m1").unwrap().unwrap();
        assert!(item.text.contains("[redacted]"));
        assert_eq!(item.sanitized_backup.as_deref(), Some(text.as_str()));
        assert!(item.needs_reindex);
    }

    #[test]
    fn sanitize_dry_run_does_not_mutate() {
        let (reindexer, store, _index) = reindexer();
        let payload = "B".repeat(120);
        let text = format!("blob: {payload}");
        seed(&store, "u1", "m1", &text);

        let result = reindexer
            .sanitize_corrupted_content(Some("u1"), Some(Tier::Working), true, Utc::now())
            .unwrap();
        assert_eq!(result.sanitized, 1);

        let item = store.get("u1", "m1").unwrap().unwrap();
        assert_eq!(item.text, text);
        assert!(item.sanitized_backup.is_none());
    }

    #[test]
    fn count_corrupted_content_matches_sanitize_count() {
        let (reindexer, store, _index) = reindexer();
        seed(&store, "u1", "m1", "clean text");
        seed(&store, "u1", "m2", &format!("dirty: {}", "C".repeat(120)));

        let count = reindexer.count_corrupted_content(Some("u1"), Some(Tier::Working)).unwrap();
        assert_eq!(count, 1);
    }
}
