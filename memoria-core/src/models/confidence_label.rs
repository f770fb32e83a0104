use serde::{Deserialize, Serialize};

/// Coarse confidence label attached to an injected context block (§4.5 stage 11, glossary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLabel {
    Low,
    Medium,
    High,
}

impl ConfidenceLabel {
    /// One step down, floored at `Low` (§4.5 stage 11 override rules).
    pub fn downgrade(self) -> Self {
        match self {
            ConfidenceLabel::High => ConfidenceLabel::Medium,
            ConfidenceLabel::Medium | ConfidenceLabel::Low => ConfidenceLabel::Low,
        }
    }

    /// One step up, ceilinged at `High`.
    pub fn upgrade(self) -> Self {
        match self {
            ConfidenceLabel::Low => ConfidenceLabel::Medium,
            ConfidenceLabel::Medium | ConfidenceLabel::High => ConfidenceLabel::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfidenceLabel::High => "high",
            ConfidenceLabel::Medium => "medium",
            ConfidenceLabel::Low => "low",
        }
    }
}
