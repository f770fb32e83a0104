use serde::{Deserialize, Serialize};

/// Curated quality signal for an item (§3).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Quality {
    pub importance: f64,
    pub confidence: f64,
    pub mentioned_count: u32,
}

impl Quality {
    pub fn new(importance: f64, confidence: f64) -> Self {
        Self {
            importance: importance.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
            mentioned_count: 0,
        }
    }

    /// `quality_score = importance * confidence` (§3).
    pub fn quality_score(&self) -> f64 {
        self.importance * self.confidence
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self {
            importance: 0.5,
            confidence: 0.5,
            mentioned_count: 0,
        }
    }
}
