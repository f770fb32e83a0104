//! Stage 2 (§4.5): optional entity pre-filter. Extracts low-cardinality
//! entity tokens from the query text and, if any are found, asks the
//! `VectorIndex` for the candidate id set they narrow the search to.

/// Extract capitalized words and quoted substrings as normalized entity
/// tokens (lowercased, matching `MemoryItem.entities`' normalization).
pub fn extract_entities(query: &str) -> Vec<String> {
    let mut entities = Vec::new();

    let mut in_quote = false;
    let mut current = String::new();
    for c in query.chars() {
        if c == '"' {
            if in_quote && !current.is_empty() {
                entities.push(current.to_lowercase());
                current.clear();
            }
            in_quote = !in_quote;
        } else if in_quote {
            current.push(c);
        }
    }

    for word in query.split_whitespace() {
        let trimmed: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
        if trimmed.len() > 2 && trimmed.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
            entities.push(trimmed.to_lowercase());
        }
    }

    entities.sort();
    entities.dedup();
    entities
}
