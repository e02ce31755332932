// src/cluster/tokenize.rs
//! Headline tokenizer: lowercase ASCII alphanumeric runs, longer than two characters,
//! with a fixed English stop-word list removed.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Tokens of this length or shorter are dropped.
const MIN_TOKEN_LEN: usize = 2;

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "is", "are", "was", "were", "be", "been", "has", "have", "had", "will", "would",
        "could", "should", "may", "might", "can", "this", "that", "these", "those", "it", "its",
        "as", "not", "no", "new", "says", "said", "report", "reports", "over", "than", "more",
        "after", "before", "about", "up", "out", "into", "his", "her", "their", "they", "he",
        "she", "we", "us", "amid", "just", "now", "then", "when",
    ]
    .into_iter()
    .collect()
});

pub fn is_stop_word(tok: &str) -> bool {
    STOP_WORDS.contains(tok)
}

/// Normalized term sequence for one document. Empty input yields an empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| t.len() > MIN_TOKEN_LEN)
        .map(|t| t.to_ascii_lowercase())
        .filter(|t| !is_stop_word(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_drops_short_and_stop_words() {
        let toks = tokenize("The Fed RAISES rates, says Powell; US up 2%");
        assert_eq!(toks, vec!["fed", "raises", "rates", "powell"]);
    }

    #[test]
    fn punctuation_splits_tokens() {
        assert_eq!(tokenize("wild-fire/evacuations"), vec!["wild", "fire", "evacuations"]);
    }

    #[test]
    fn non_ascii_letters_act_as_separators() {
        assert_eq!(tokenize("café crème brûlée"), vec!["caf"]);
    }

    #[test]
    fn empty_and_whitespace_only_inputs() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
        assert!(tokenize("the and of").is_empty());
    }

    #[test]
    fn digits_are_kept() {
        assert_eq!(tokenize("G20 summit 2025"), vec!["g20", "summit", "2025"]);
    }
}
