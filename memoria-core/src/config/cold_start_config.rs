use serde::{Deserialize, Serialize};

/// What `prefetchContext` substitutes when the caller passes an empty query
/// (a fresh conversation with nothing yet to search for) (§6 "Cold-start").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColdStartConfig {
    /// Result limit used for the substituted query.
    pub limit: usize,
    /// Query text substituted for an empty caller query.
    pub query: String,
    /// Text prepended to the assembled injection block.
    pub header: String,
    /// Text appended to the assembled injection block.
    pub footer: String,
}

impl Default for ColdStartConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            query: "general context".to_string(),
            header: String::new(),
            footer: String::new(),
        }
    }
}
