use serde::{Deserialize, Serialize};

use crate::constants;

/// Background consistency checking and reindex concurrency (§4.12-4.13).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsistencyConfig {
    /// Grace period after startup before the first sweep runs, letting
    /// in-flight writes settle.
    pub warmup_secs: u64,
    /// Interval between consistency sweeps.
    pub sweep_interval_secs: u64,
    /// Number of items reindexed concurrently during a reindex job.
    pub reindex_concurrency: usize,
    /// Page size used when scrolling the vector index during a sweep.
    pub scroll_page_size: usize,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            warmup_secs: constants::CONSISTENCY_WARMUP_SECS,
            sweep_interval_secs: constants::CONSISTENCY_SWEEP_INTERVAL_SECS,
            reindex_concurrency: constants::DEFAULT_REINDEX_CONCURRENCY,
            scroll_page_size: 500,
        }
    }
}
