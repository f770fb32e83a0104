use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse outcome classification for a single feedback/outcome event (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Worked,
    Failed,
    Partial,
    Unknown,
}

impl Outcome {
    /// Map a feedback score in `{-1, 0, 1}` to an outcome (§4.7 `recordFeedback`).
    pub fn from_feedback_score(score: i32) -> Self {
        match score {
            1 => Outcome::Worked,
            -1 => Outcome::Failed,
            0 => Outcome::Partial,
            _ => Outcome::Unknown,
        }
    }

    /// Coarse rank-adjustment delta for this outcome, clamped to [0, 1] (§4.7).
    pub fn score_delta(self) -> f64 {
        match self {
            Outcome::Worked => 0.2,
            Outcome::Partial => 0.05,
            Outcome::Failed => -0.3,
            Outcome::Unknown => 0.0,
        }
    }
}

/// A single outcome event applied to a memory item (§3 supporting entities).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeEvent {
    pub memory_id: String,
    pub user_id: String,
    pub outcome: Outcome,
    pub related_memory_ids: Vec<String>,
    pub recorded_at: DateTime<Utc>,
}

/// Outcome attached to an entry in the action knowledge-graph (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action_id: String,
    pub memory_id: String,
    pub outcome: Outcome,
    pub key_takeaway: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
