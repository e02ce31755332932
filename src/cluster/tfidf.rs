// src/cluster/tfidf.rs
//! Corpus-relative TF-IDF vectors.
//!
//! - TF(t,d)  = count(t,d) / |tokens(d)|
//! - IDF(t)   = ln((N + 1) / (DF(t) + 1)) + 1   (smoothed, always positive)
//! - W(t,d)   = TF(t,d) * IDF(t)
//!
//! The IDF table is derived from the batch passed in and dropped when the call returns.
//! Maps are ordered so floating-point sums run in the same order on every run.

use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use super::tokenize::tokenize;

pub type TermWeights = BTreeMap<String, f64>;

/// Ephemeral per-document vector; lives for one clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentVector {
    pub id: String,
    pub tf: TermWeights,
    pub weights: TermWeights,
    /// Euclidean norm over all of `weights`.
    pub magnitude: f64,
}

impl DocumentVector {
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Normalized term frequencies. Empty token list → empty map.
pub fn term_frequency(tokens: &[String]) -> TermWeights {
    let mut tf = TermWeights::new();
    if tokens.is_empty() {
        return tf;
    }
    for t in tokens {
        *tf.entry(t.clone()).or_insert(0.0) += 1.0;
    }
    let len = tokens.len() as f64;
    for v in tf.values_mut() {
        *v /= len;
    }
    tf
}

/// Smoothed IDF for every term seen in `docs` (each inner slice is one document's tokens).
pub fn inverse_document_frequency(docs: &[Vec<String>]) -> TermWeights {
    let n = docs.len() as f64;
    let mut df: BTreeMap<&str, usize> = BTreeMap::new();
    for tokens in docs {
        let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
        for term in unique {
            *df.entry(term).or_insert(0) += 1;
        }
    }
    df.into_iter()
        .map(|(term, count)| {
            let idf = ((n + 1.0) / (count as f64 + 1.0)).ln() + 1.0;
            (term.to_string(), idf)
        })
        .collect()
}

pub fn magnitude(weights: &TermWeights) -> f64 {
    weights.values().map(|v| v * v).sum::<f64>().sqrt()
}

/// Build TF-IDF vectors for `(id, text)` documents against their own batch.
///
/// Tokenization and per-document weighting run in parallel once the shared IDF
/// table exists; output order always matches input order.
pub fn vectorize<S: AsRef<str> + Sync>(docs: &[(String, S)]) -> Vec<DocumentVector> {
    let tokens: Vec<Vec<String>> = docs
        .par_iter()
        .map(|(_, text)| tokenize(text.as_ref()))
        .collect();

    let idf = inverse_document_frequency(&tokens);

    docs.par_iter()
        .zip(tokens.par_iter())
        .map(|((id, _), toks)| {
            let tf = term_frequency(toks);
            let weights: TermWeights = tf
                .iter()
                .map(|(term, f)| (term.clone(), f * idf.get(term).copied().unwrap_or(1.0)))
                .collect();
            let magnitude = magnitude(&weights);
            DocumentVector {
                id: id.clone(),
                tf,
                weights,
                magnitude,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<(String, String)> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| (format!("d{i}"), t.to_string()))
            .collect()
    }

    #[test]
    fn tf_is_normalized_by_length() {
        let toks: Vec<String> = ["storm", "storm", "coast", "flood"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let tf = term_frequency(&toks);
        assert!((tf["storm"] - 0.5).abs() < 1e-12);
        assert!((tf["coast"] - 0.25).abs() < 1e-12);
        assert!((tf.values().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn idf_is_smoothed_and_positive() {
        let v = vectorize(&docs(&["storm coast", "storm inland", "storm market"]));
        // "storm" appears in all 3 docs: ln(4/4) + 1 = 1
        let storm_w = v[0].weights["storm"];
        assert!((storm_w - 0.5).abs() < 1e-12);
        // "coast" appears once: ln(4/2) + 1
        let coast_w = v[0].weights["coast"];
        assert!((coast_w - 0.5 * (2f64.ln() + 1.0)).abs() < 1e-12);
        assert!(v.iter().all(|d| d.weights.values().all(|w| *w > 0.0)));
    }

    #[test]
    fn idf_depends_on_the_batch() {
        let a = vectorize(&docs(&["storm coast", "storm inland"]));
        let b = vectorize(&docs(&["storm coast", "market rally"]));
        assert_ne!(a[0].weights["storm"], b[0].weights["storm"]);
    }

    #[test]
    fn empty_document_has_zero_magnitude() {
        let v = vectorize(&docs(&["", "the of and", "storm coast"]));
        assert!(v[0].is_empty());
        assert_eq!(v[0].magnitude, 0.0);
        assert_eq!(v[1].magnitude, 0.0);
        assert!(v[2].magnitude > 0.0);
    }

    #[test]
    fn preserves_input_order_and_ids() {
        let v = vectorize(&docs(&["one storm", "two market", "three senate"]));
        let ids: Vec<&str> = v.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d0", "d1", "d2"]);
    }
}
