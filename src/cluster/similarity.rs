// src/cluster/similarity.rs
//! Cosine similarity between TF-IDF vectors.

use super::tfidf::{DocumentVector, TermWeights};

/// Dot product over shared terms divided by the product of full magnitudes.
/// Zero-magnitude input yields exactly 0.0 (never NaN).
pub fn cosine(a: &DocumentVector, b: &DocumentVector) -> f64 {
    cosine_with_norms(&a.weights, a.magnitude, &b.weights, b.magnitude)
}

/// Same as [`cosine`] for bare weight maps; magnitudes are computed here.
pub fn cosine_weights(a: &TermWeights, b: &TermWeights) -> f64 {
    let ma = super::tfidf::magnitude(a);
    let mb = super::tfidf::magnitude(b);
    cosine_with_norms(a, ma, b, mb)
}

fn cosine_with_norms(a: &TermWeights, mag_a: f64, b: &TermWeights, mag_b: f64) -> f64 {
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    // Walk the smaller map; shared terms still come out in key order either way.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, wa)| large.get(term).map(|wb| wa * wb))
        .sum();
    let sim = dot / (mag_a * mag_b);
    if sim.is_finite() {
        sim
    } else {
        0.0
    }
}
