use serde::{Deserialize, Serialize};

/// Logging/tracing configuration (ambient stack).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub tracing_enabled: bool,
    /// Minimum interval between repeated health-report computations.
    pub health_cache_secs: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            tracing_enabled: false,
            health_cache_secs: 10,
        }
    }
}
