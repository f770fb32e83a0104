use serde::{Deserialize, Serialize};

use crate::constants;

/// Tier promotion and TTL sweep configuration (§4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// How often the background promotion/TTL sweep runs.
    pub promotion_period_secs: u64,
    /// Message-count trigger: run an inline promotion pass every N
    /// messages in a conversation, independent of the periodic sweep.
    pub promotion_trigger_message_interval: u64,
    /// Whether items may be demoted as well as promoted.
    pub demotion_enabled: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            promotion_period_secs: constants::DEFAULT_PROMOTION_PERIOD_SECS,
            promotion_trigger_message_interval: constants::PROMOTION_TRIGGER_MESSAGE_INTERVAL,
            demotion_enabled: true,
        }
    }
}
