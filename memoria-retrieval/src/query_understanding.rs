//! Stage 1 (§4.5): language detection, "specific query" classification, and
//! target-limit selection. "These are the only places query-shape policy is
//! encoded."

use memoria_core::models::Language;

/// Heuristic patterns for a query that names a single thing precisely enough
/// that a broad recall pass would dilute it (identity lookup, a quoted
/// substring, or a demonstrative reference), in English and Hebrew.
pub fn is_specific(query: &str) -> bool {
    let q = query.trim();
    if q.contains('"') || q.contains('\u{201c}') || q.contains('\u{201d}') {
        return true;
    }
    let lower = q.to_lowercase();
    const EN_MARKERS: &[&str] = &[
        "my name is", "who am i", "what is my", "this one", "that one", "the one i",
    ];
    const HE_MARKERS: &[&str] = &["מי אני", "השם שלי", "הדבר הזה", "זה ש"];
    EN_MARKERS.iter().any(|m| lower.contains(m)) || HE_MARKERS.iter().any(|m| q.contains(m))
}

/// Choose a target result limit from query-shape keywords (§4.5 stage 1).
pub fn target_limit(query: &str) -> usize {
    let lower = query.to_lowercase();
    if lower.contains("show all") || lower.contains("list") {
        20
    } else if lower.contains("my name") || lower.contains("who am i") || lower.contains("what is my") {
        5
    } else if lower.starts_with("how do") || lower.starts_with("how to") || lower.contains("how can i") {
        12
    } else {
        10
    }
}

pub fn detect_language(query: &str) -> Language {
    Language::detect(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_substring_is_specific() {
        assert!(is_specific("what does \"login\" error mean"));
    }

    #[test]
    fn identity_lookup_is_specific() {
        assert!(is_specific("what is my name"));
    }

    #[test]
    fn ordinary_query_is_not_specific() {
        assert!(!is_specific("how does the retry policy work"));
    }

    #[test]
    fn list_keyword_picks_wide_limit() {
        assert_eq!(target_limit("show all my projects"), 20);
    }

    #[test]
    fn identity_keyword_picks_narrow_limit() {
        assert_eq!(target_limit("what is my favorite color"), 5);
    }

    #[test]
    fn how_to_keyword_picks_medium_limit() {
        assert_eq!(target_limit("how do I configure retries"), 12);
    }

    #[test]
    fn default_limit_otherwise() {
        assert_eq!(target_limit("retry policy"), 10);
    }
}
