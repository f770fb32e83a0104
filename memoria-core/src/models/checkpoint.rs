use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resumable reindex checkpoint (§2, §4.13).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReindexCheckpoint {
    pub job_id: String,
    pub user_id: Option<String>,
    pub tier: Option<String>,
    pub last_memory_id: Option<String>,
    pub processed: u64,
    pub total: Option<u64>,
    pub updated_at: DateTime<Utc>,
}

impl ReindexCheckpoint {
    pub fn new(job_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            job_id: job_id.into(),
            user_id: None,
            tier: None,
            last_memory_id: None,
            processed: 0,
            total: None,
            updated_at: now,
        }
    }
}

/// One entry in the consistency log (§4.12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyEventType {
    MissingVectorPoint,
    OrphanVectorPoint,
    VectorHashMismatch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyLogEntry {
    pub event_type: ConsistencyEventType,
    pub memory_id: String,
    pub details: String,
    pub repaired: bool,
    pub logged_at: DateTime<Utc>,
}
