use serde_json::Value;
use serde::{Deserialize, Serialize};

/// Per-user profile: goals, values, and arbitrary structured data (§2 RecordStore).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserProfile {
    pub user_id: String,
    pub goals: Vec<String>,
    pub values: Vec<String>,
    pub data: Value,
}
