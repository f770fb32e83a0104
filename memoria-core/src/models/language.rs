use serde::{Deserialize, Serialize};

/// Detected/declared language of an item's text (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    He,
    En,
    Mixed,
    None,
}

impl Language {
    /// Hebrew iff Hebrew-char count exceeds Latin-char count (§4.5 stage 1).
    pub fn detect(text: &str) -> Self {
        let mut hebrew = 0usize;
        let mut latin = 0usize;
        for c in text.chars() {
            if ('\u{0590}'..='\u{05FF}').contains(&c) {
                hebrew += 1;
            } else if c.is_ascii_alphabetic() {
                latin += 1;
            }
        }
        match (hebrew, latin) {
            (0, 0) => Language::None,
            (h, l) if h > l => Language::He,
            (h, l) if l > h => Language::En,
            _ => Language::Mixed,
        }
    }
}
