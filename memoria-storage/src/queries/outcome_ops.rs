use memoria_core::errors::CortexResult;
use memoria_core::models::{ActionOutcome, Outcome, OutcomeEvent};
use rusqlite::{params, Connection};

use crate::to_storage_err;

fn outcome_str(o: Outcome) -> &'static str {
    match o {
        Outcome::Worked => "worked",
        Outcome::Failed => "failed",
        Outcome::Partial => "partial",
        Outcome::Unknown => "unknown",
    }
}

pub fn record_event(conn: &Connection, event: &OutcomeEvent) -> CortexResult<()> {
    let related_json = serde_json::to_string(&event.related_memory_ids)
        .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute(
        "INSERT INTO outcome_events (memory_id, user_id, outcome, related_memory_ids_json, recorded_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            event.memory_id,
            event.user_id,
            outcome_str(event.outcome),
            related_json,
            event.recorded_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn record_action_outcome(conn: &Connection, outcome: &ActionOutcome) -> CortexResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO action_outcomes (action_id, memory_id, outcome, key_takeaway, recorded_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            outcome.action_id,
            outcome.memory_id,
            outcome_str(outcome.outcome),
            outcome.key_takeaway,
            outcome.recorded_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

