use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse lifecycle bucket of a memory item (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Working,
    History,
    Patterns,
    Documents,
    MemoryBank,
    DatagovSchema,
    DatagovExpansion,
}

impl Tier {
    /// Every tier, in a stable order used by full-sweep operations (reindex, backup).
    pub const ALL: [Tier; 7] = [
        Tier::Working,
        Tier::History,
        Tier::Patterns,
        Tier::Documents,
        Tier::MemoryBank,
        Tier::DatagovSchema,
        Tier::DatagovExpansion,
    ];

    /// Tiers that carry a TTL-driven expiry and are subject to promotion (§3, §4.8).
    pub const TTL_TIERS: [Tier; 3] = [Tier::Working, Tier::History, Tier::Patterns];

    /// Tiers the Promoter must never touch (§4.8 rule 5).
    pub const PROMOTION_EXEMPT: [Tier; 4] = [
        Tier::Documents,
        Tier::MemoryBank,
        Tier::DatagovSchema,
        Tier::DatagovExpansion,
    ];

    /// Tiers that are never outcome-scored and always weight toward embedding
    /// similarity (§3 invariants).
    pub fn is_never_outcome_scored(self) -> bool {
        matches!(
            self,
            Tier::Documents | Tier::DatagovSchema | Tier::DatagovExpansion
        )
    }

    /// Whether this tier carries a TTL-based `expires_at`.
    pub fn has_ttl(self) -> bool {
        Self::TTL_TIERS.contains(&self)
    }

    /// Whether the Promoter is allowed to transition/archive this tier.
    pub fn is_promotion_eligible(self) -> bool {
        !Self::PROMOTION_EXEMPT.contains(&self)
    }

    /// Default TTL for tiers that carry one, per the promotion policy (§4.8, §6).
    /// `working` items are short-lived scratch context; `history` lives longer
    /// once an item has proven itself; `patterns` is the longest-lived TTL tier
    /// before graduating out of the TTL system entirely via `memory_bank`.
    pub fn default_ttl_days(self) -> Option<i64> {
        match self {
            Tier::Working => Some(7),
            Tier::History => Some(60),
            Tier::Patterns => Some(180),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Working => "working",
            Tier::History => "history",
            Tier::Patterns => "patterns",
            Tier::Documents => "documents",
            Tier::MemoryBank => "memory_bank",
            Tier::DatagovSchema => "datagov_schema",
            Tier::DatagovExpansion => "datagov_expansion",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
