// src/cluster/keywords.rs
//! Topic labels from aggregated TF-IDF mass.
//!
//! Member vectors are rebuilt against the cluster itself (the cluster is the corpus),
//! summed per term, and the heaviest terms become the label.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::tfidf::vectorize;
use super::tokenize::tokenize;

/// Top `top_n` terms by summed weight, uppercased. Ties keep the order in which
/// terms first appear across members, then within each member's text.
pub fn top_keywords<S: AsRef<str> + Sync>(docs: &[(String, S)], top_n: usize) -> Vec<String> {
    let mut ranked: Vec<(String, f64)> = Vec::new();
    let mut slot: HashMap<String, usize> = HashMap::new();

    for ((_, text), doc) in docs.iter().zip(vectorize(docs)) {
        for term in tokenize(text.as_ref()) {
            if !slot.contains_key(&term) {
                slot.insert(term.clone(), ranked.len());
                ranked.push((term, 0.0));
            }
        }
        for (term, w) in doc.weights {
            if let Some(&i) = slot.get(&term) {
                ranked[i].1 += w;
            }
        }
    }

    // Stable: equal weights stay in first-seen order.
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(term, _)| term.to_ascii_uppercase())
        .collect()
}

/// Join keywords into a label; falls back to `STORY {position + 1}` when none survive.
pub fn topic_label(keywords: &[String], separator: &str, position: usize) -> String {
    if keywords.is_empty() {
        format!("STORY {}", position + 1)
    } else {
        keywords.join(separator)
    }
}
