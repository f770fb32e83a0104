use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::embedding_info::EmbeddingInfo;
use super::language::Language;
use super::outcome::Outcome;
use super::quality::Quality;
use super::source::Source;
use super::stats::Stats;
use super::status::Status;
use super::tier::Tier;
use super::versioning::{PersonalityMapping, Versioning};

/// The universal memory item (§3). Every retrievable piece of context in the
/// system is a `MemoryItem`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryItem {
    pub memory_id: String,
    pub user_id: String,
    pub org_id: Option<String>,

    pub tier: Tier,
    pub status: Status,

    pub text: String,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    /// Normalized entity tokens, capped at `MAX_ENTITIES_PER_ITEM` (§3).
    pub entities: Vec<String>,

    pub source: Source,
    pub quality: Quality,
    pub stats: Stats,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub archived_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,

    pub embedding: Option<EmbeddingInfo>,
    pub versioning: Versioning,
    pub personality: Option<PersonalityMapping>,

    pub language: Language,
    pub always_inject: bool,
    pub needs_reindex: bool,
    pub reindex_reason: Option<String>,
    /// Pre-sanitization original text, set by content sanitization (§4.13)
    /// so a stripped base64/binary fragment is never permanently lost.
    pub sanitized_backup: Option<String>,
}

impl MemoryItem {
    /// Construct a new item in the `working` tier with fresh stats, matching
    /// the Store operation's creation contract (§3 Lifecycle).
    pub fn new(
        memory_id: impl Into<String>,
        user_id: impl Into<String>,
        tier: Tier,
        text: impl Into<String>,
        source: Source,
        now: DateTime<Utc>,
    ) -> Self {
        let text = text.into();
        let mut entities = Vec::new();
        entities.truncate(crate::constants::MAX_ENTITIES_PER_ITEM);
        let language = Language::detect(&text);
        let expires_at = tier
            .default_ttl_days()
            .map(|days| now + chrono::Duration::days(days));

        Self {
            memory_id: memory_id.into(),
            user_id: user_id.into(),
            org_id: None,
            tier,
            status: Status::Active,
            text,
            summary: None,
            tags: Vec::new(),
            entities,
            source,
            quality: Quality::default(),
            stats: Stats::default(),
            created_at: now,
            updated_at: now,
            archived_at: None,
            expires_at,
            embedding: None,
            versioning: Versioning::default(),
            personality: None,
            language,
            always_inject: false,
            needs_reindex: true,
            reindex_reason: Some("created".to_string()),
            sanitized_backup: None,
        }
    }

    /// Visibility predicate: `status == active` (ghosting is applied
    /// separately by the caller via `GhostRegistry`, since it is orthogonal
    /// to status — §3 invariants).
    pub fn is_active(&self) -> bool {
        self.status.is_retrievable()
    }

    /// Whether this tier/item combination is ever outcome-scored (§3 invariants).
    pub fn is_outcome_scored(&self) -> bool {
        !self.tier.is_never_outcome_scored()
    }

    /// Record an outcome event against this item's stats (§4.7). Does not
    /// touch tier/status — that is the Promoter's job.
    pub fn apply_outcome(&mut self, outcome: Outcome, now: DateTime<Utc>) {
        self.stats.apply_outcome(outcome, now);
        self.updated_at = now;
    }

    /// Mark text/tags as updated, flagging the item for reindexing (§3 Lifecycle).
    pub fn mark_text_updated(&mut self, new_text: String, now: DateTime<Utc>) {
        self.text = new_text;
        self.language = Language::detect(&self.text);
        self.needs_reindex = true;
        self.reindex_reason = Some("text_updated".to_string());
        self.updated_at = now;
    }

    /// Whether the stored `vector_hash` still matches the current text.
    pub fn embedding_is_current(&self) -> bool {
        match &self.embedding {
            Some(info) => info.matches(&self.text),
            None => false,
        }
    }
}
