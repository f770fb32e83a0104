use serde::{Deserialize, Serialize};

/// Book/document metadata carried by `document`-tier sources (§3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookMetadata {
    pub title: String,
    pub author: Option<String>,
    pub chunk_index: usize,
    /// blake3 hash of the source document, for dedup/reimport detection.
    pub document_hash: String,
}

/// Tagged variant describing where a memory item originated (§3).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    User {
        conversation_id: String,
        message_id: Option<String>,
    },
    Assistant {
        conversation_id: String,
        message_id: Option<String>,
    },
    Tool {
        conversation_id: Option<String>,
        tool_id: String,
    },
    Document {
        doc_id: String,
        book: Option<BookMetadata>,
    },
    System,
}

impl Source {
    pub fn conversation_id(&self) -> Option<&str> {
        match self {
            Source::User { conversation_id, .. } | Source::Assistant { conversation_id, .. } => {
                Some(conversation_id.as_str())
            }
            Source::Tool { conversation_id, .. } => conversation_id.as_deref(),
            Source::Document { .. } | Source::System => None,
        }
    }
}
