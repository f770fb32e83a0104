//! Background scheduling for the two periodic jobs the engine owns: tier
//! promotion (§4.8) and the durable/vector consistency sweep (§4.12).
//!
//! Both engine calls are synchronous (they hold std mutexes and do blocking
//! I/O), so each tick runs on a blocking task rather than directly on the
//! async scheduler loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::engine::MemoriaEngine;

/// Handles for the two background tasks, so a caller can shut them down.
pub struct SchedulerHandles {
    promotion: tokio::task::JoinHandle<()>,
    consistency: tokio::task::JoinHandle<()>,
}

impl SchedulerHandles {
    pub fn abort(&self) {
        self.promotion.abort();
        self.consistency.abort();
    }
}

/// Spawns the promotion and consistency-sweep loops on the current Tokio
/// runtime. `promotion_period_secs` and (`warmup_secs`, `sweep_interval_secs`)
/// come from the engine's configured periods (§4.8, §4.12).
pub fn spawn(engine: Arc<MemoriaEngine>, promotion_period_secs: u64) -> SchedulerHandles {
    let promotion = {
        let engine = engine.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(promotion_period_secs));
            ticker.tick().await; // first tick fires immediately; skip it
            loop {
                ticker.tick().await;
                let engine = engine.clone();
                let result = tokio::task::spawn_blocking(move || engine.promote_now(None)).await;
                match result {
                    Ok(Ok(stats)) => info!(
                        promoted = stats.promoted,
                        archived = stats.archived,
                        errors = stats.errors,
                        "promotion cycle complete"
                    ),
                    Ok(Err(e)) => error!(error = %e, "promotion cycle failed"),
                    Err(e) => error!(error = %e, "promotion cycle task panicked"),
                }
            }
        })
    };

    let warmup_secs = engine.config().consistency.warmup_secs;
    let sweep_interval_secs = engine.config().consistency.sweep_interval_secs;
    let sample_size = engine.config().consistency.scroll_page_size;
    let consistency = {
        let engine = engine.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(warmup_secs)).await;
            let mut ticker = tokio::time::interval(Duration::from_secs(sweep_interval_secs));
            loop {
                ticker.tick().await;
                let engine = engine.clone();
                let result =
                    tokio::task::spawn_blocking(move || engine.consistency_check(None, false, Some(sample_size)))
                        .await;
                match result {
                    Ok(Ok(report)) => info!(
                        checked = report.checked,
                        repaired = report.missing_repaired + report.hash_mismatch_repaired,
                        orphans_deleted = report.orphans_deleted,
                        "consistency sweep complete"
                    ),
                    Ok(Err(e)) => error!(error = %e, "consistency sweep failed"),
                    Err(e) => error!(error = %e, "consistency sweep task panicked"),
                }
            }
        })
    };

    SchedulerHandles { promotion, consistency }
}
