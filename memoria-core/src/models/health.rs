use serde::{Deserialize, Serialize};

/// Overall health classification for a dependency or the system as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsystemHealth {
    pub name: String,
    pub status: HealthStatus,
    pub detail: Option<String>,
}

/// Snapshot of per-process counters used to build a [`HealthReport`].
#[derive(Debug, Clone, Default)]
pub struct HealthSnapshot {
    pub breaker_states: Vec<(String, String)>,
    pub embedding_cache_hit_rate: f64,
    pub context_cache_hit_rate: f64,
    pub last_consistency_sweep_secs_ago: Option<i64>,
    pub last_reindex_secs_ago: Option<i64>,
    pub active_users_tracked: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub subsystems: Vec<SubsystemHealth>,
}
