// src/cluster/grouping.rs
//! Seed-based greedy grouping.
//!
//! Documents are visited in batch order. Each unprocessed document seeds a new group;
//! every later unprocessed document whose similarity *to the seed* reaches the threshold
//! joins it. Membership is not transitive: two members need not be similar to each
//! other, and a document close only to a non-seed member lands elsewhere. Which document
//! becomes a seed decides membership, so the outer loop stays sequential.

use rayon::prelude::*;

use super::similarity::cosine;
use super::tfidf::DocumentVector;

/// Partition `vectors` into groups of indices, one per seed, in seed-encounter order.
/// Within a group the seed comes first, followed by joiners in batch order.
pub fn group_by_seed(vectors: &[DocumentVector], threshold: f64) -> Vec<Vec<usize>> {
    let n = vectors.len();
    let mut processed = vec![false; n];
    let mut groups = Vec::new();

    for seed in 0..n {
        if processed[seed] {
            continue;
        }
        processed[seed] = true;

        // Everything before `seed` is already processed, so only later indices can join.
        // Similarities against the seed are independent of each other.
        let joiners: Vec<usize> = (seed + 1..n)
            .into_par_iter()
            .filter(|&j| !processed[j] && cosine(&vectors[seed], &vectors[j]) >= threshold)
            .collect();

        let mut group = Vec::with_capacity(joiners.len() + 1);
        group.push(seed);
        for j in joiners {
            processed[j] = true;
            group.push(j);
        }
        groups.push(group);
    }

    groups
}
