//! Lexicon sentiment for articles that arrive without a tone score.
//!
//! Word scores come from `sentiment_lexicon.json`; a negator within the previous
//! three tokens flips the sign. The raw sum is squashed into `[-1, 1]`.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::article::Article;

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).unwrap_or_default()
});

/// Larger values flatten the curve (more words needed to approach ±1).
const SQUASH_ALPHA: f64 = 15.0;

#[derive(Debug, Clone, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Returns (raw score, token count).
    pub fn score_text(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score: i32 = 0;

        for (i, w) in tokens.iter().enumerate() {
            let base = self.word_score(w);
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            score += if negated { -base } else { base };
        }

        (score, tokens.len())
    }

    /// Normalized tone in `[-1, 1]`.
    pub fn sentiment(&self, text: &str) -> f64 {
        let (score, _) = self.score_text(text);
        let s = f64::from(score);
        if score == 0 {
            0.0
        } else {
            (s / (s * s + SQUASH_ALPHA).sqrt()).clamp(-1.0, 1.0)
        }
    }

    /// Fill sentiment on articles still at 0 (unscored). Scored articles are untouched.
    pub fn fill_missing(&self, articles: &mut [Article]) {
        for a in articles.iter_mut().filter(|a| a.sentiment == 0.0) {
            a.sentiment = self.sentiment(&a.text());
        }
    }
}

/// Lowercase word tokens; apostrophes stay inside words so "isn't" survives.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "without"
            | "denies"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::fixtures::article;

    #[test]
    fn lexicon_loads() {
        assert!(LEXICON.len() > 50);
    }

    #[test]
    fn positive_and_negative_headlines() {
        let a = SentimentAnalyzer::new();
        assert!(a.sentiment("Ceasefire brings relief and hope") > 0.0);
        assert!(a.sentiment("Deadly attack kills dozens, chaos in capital") < 0.0);
        assert_eq!(a.sentiment("Council meets on Tuesday"), 0.0);
    }

    #[test]
    fn negation_flips_sign() {
        let a = SentimentAnalyzer::new();
        let (plain, _) = a.score_text("talks fail");
        let (negated, _) = a.score_text("talks did not fail");
        assert_eq!(plain, -2);
        assert_eq!(negated, 2);
    }

    #[test]
    fn stays_in_unit_range() {
        let a = SentimentAnalyzer::new();
        let s = a.sentiment("war war war war war war war war war war");
        assert!(s >= -1.0 && s < -0.9);
    }

    #[test]
    fn fill_only_touches_unscored() {
        let mut batch = vec![
            article("a", "Markets rally on recovery hopes", "x.com", "2025-03-01T10:00:00Z"),
            article("b", "Markets rally on recovery hopes", "y.com", "2025-03-01T10:00:00Z"),
        ];
        batch[1].sentiment = -0.5;
        SentimentAnalyzer::new().fill_missing(&mut batch);
        assert!(batch[0].sentiment > 0.0);
        assert_eq!(batch[1].sentiment, -0.5);
    }
}
