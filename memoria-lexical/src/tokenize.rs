/// Tokenize text into lowercase alphanumeric terms, dropping single-character
/// tokens (likely punctuation fragments or noise).
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|s| s.len() >= 2)
        .map(|s| s.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_lowercases() {
        assert_eq!(
            tokenize("Retry Policy, v2!"),
            vec!["retry", "policy", "v2"]
        );
    }

    #[test]
    fn drops_single_char_tokens() {
        assert_eq!(tokenize("a b cc"), vec!["cc"]);
    }
}
