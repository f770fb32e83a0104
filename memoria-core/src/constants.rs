/// Engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backup wire format major version this build produces and accepts.
pub const BACKUP_FORMAT_MAJOR: u32 = 2;

/// Maximum entities retained per item (§3 MemoryItem.entities).
pub const MAX_ENTITIES_PER_ITEM: usize = 32;

/// Maximum versions retained per item before the oldest is pruned.
pub const MAX_VERSIONS_PER_ITEM: usize = 10;

/// Maximum batch size accepted by bulk store/reindex operations.
pub const MAX_BULK_BATCH_SIZE: usize = 1000;

/// Default Wilson score assigned to a freshly created item (§4.11).
pub const DEFAULT_INITIAL_WILSON_SCORE: f64 = 0.5;

/// z-value for the 95% Wilson confidence interval (§4.11).
pub const WILSON_Z: f64 = 1.96;

/// Candidate fetch multiplier applied to `limit` in vector/lexical stages (§4.5 stage 4).
pub const DEFAULT_CANDIDATE_FETCH_MULTIPLIER: usize = 3;

/// Default number of candidates sent to the cross-encoder reranker (§4.5 stage 6).
pub const DEFAULT_RERANK_K: usize = 10;

/// Default cap on the cross-encoder quality multiplier for memory_bank items (§4.5 stage 8c).
pub const DEFAULT_CE_MULTIPLIER_MAX: f64 = 2.0;

/// Quality-score threshold above which memory_bank items use the "high quality" weight row (§4.5 stage 7).
pub const HIGH_QUALITY_THRESHOLD: f64 = 0.8;

/// Messages between automatic promotion trigger hooks (§4.8).
pub const PROMOTION_TRIGGER_MESSAGE_INTERVAL: u64 = 20;

/// Default promoter scheduler period, in seconds (§4.8: 30 minutes).
pub const DEFAULT_PROMOTION_PERIOD_SECS: u64 = 30 * 60;

/// Consistency checker warm-up delay before the first sweep (§4.12: 5 minutes).
pub const CONSISTENCY_WARMUP_SECS: u64 = 5 * 60;

/// Consistency checker sweep interval (§4.12: 15 minutes).
pub const CONSISTENCY_SWEEP_INTERVAL_SECS: u64 = 15 * 60;

/// Default bounded concurrency for the reindexer's re-embed step (§4.13).
pub const DEFAULT_REINDEX_CONCURRENCY: usize = 5;
