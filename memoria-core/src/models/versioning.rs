use serde::{Deserialize, Serialize};

/// Version lineage for an item (§3 `versioning`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Versioning {
    pub current_version: u32,
    pub supersedes_memory_id: Option<String>,
}

/// Personality-memory mapping, when this item was seeded from a personality
/// profile rather than direct user/assistant interaction (§3 `personality`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalityMapping {
    pub source_personality_id: String,
    pub source_personality_name: String,
}
