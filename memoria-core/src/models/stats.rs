use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::outcome::Outcome;
use crate::constants::DEFAULT_INITIAL_WILSON_SCORE;
use crate::wilson;

/// Usage and outcome counters for a memory item, plus the derived reputation
/// scores (§3 `stats`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub uses: u64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub worked_count: u64,
    pub failed_count: u64,
    pub partial_count: u64,
    pub unknown_count: u64,
    /// `worked / (worked + failed)`, partial excluded (§4.7).
    pub success_rate: f64,
    /// Lower bound of the Wilson interval (§4.11).
    pub wilson_score: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            uses: 0,
            last_used_at: None,
            worked_count: 0,
            failed_count: 0,
            partial_count: 0,
            unknown_count: 0,
            success_rate: 0.0,
            wilson_score: DEFAULT_INITIAL_WILSON_SCORE,
        }
    }
}

impl Stats {
    /// Apply one outcome event: increments `uses` by exactly 1 and exactly
    /// one outcome counter by 1, then recomputes `success_rate` and
    /// `wilson_score` from the updated counts (§8 invariant 2).
    pub fn apply_outcome(&mut self, outcome: Outcome, now: DateTime<Utc>) {
        self.uses += 1;
        self.last_used_at = Some(now);
        match outcome {
            Outcome::Worked => self.worked_count += 1,
            Outcome::Failed => self.failed_count += 1,
            Outcome::Partial => self.partial_count += 1,
            Outcome::Unknown => self.unknown_count += 1,
        }
        self.recompute();
    }

    /// Recompute `success_rate` and `wilson_score` from the current counters.
    /// Idempotent and side-effect free beyond `self` — callers may invoke it
    /// after restoring counts from storage to check for drift (§8 invariant 1).
    pub fn recompute(&mut self) {
        let denom = self.worked_count + self.failed_count;
        self.success_rate = if denom == 0 {
            0.0
        } else {
            self.worked_count as f64 / denom as f64
        };
        self.wilson_score = wilson::wilson_score(self.worked_count, self.failed_count);
    }
}
