// src/scoring/mod.rs
//! Trust scoring: per-article validity and per-cluster aggregates.

pub mod aggregate;
pub mod factcheck;
pub mod validity;

pub use aggregate::{score_cluster, ClusterScores};
pub use factcheck::{fact_check_score, FactCheckIndex, FactCheckResult, Verdict};
pub use validity::{corroboration_for, ValidityScorer};
