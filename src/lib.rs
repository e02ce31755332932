// src/lib.rs
// Public library surface for the service binary and integration tests.

pub mod article;
pub mod category;
pub mod config;
pub mod error;

// Clustering: tokenizer, TF-IDF, cosine, seed grouping, topic keywords
pub mod cluster;
// Scoring: per-article validity, fact-check evidence, cluster aggregates
pub mod scoring;
pub mod pipeline;

pub mod overrides;
pub mod source_registry;

// Derived views over a ranked batch
pub mod recap;
pub mod sentiment;
pub mod trust_baseline;

pub mod api;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::article::{Article, ArticleCluster, Bias, BreakdownEntry, ScoringResult, Source};
pub use crate::category::{cluster_matches, detect_categories, Category};
pub use crate::config::EngineConfig;
pub use crate::error::{EngineError, Result};
pub use crate::overrides::{NoOverride, OverrideTable, TrustOverride};
pub use crate::pipeline::{build_clusters, build_clusters_at, PipelineContext};
pub use crate::scoring::{FactCheckIndex, FactCheckResult, Verdict};
pub use crate::source_registry::SourceRegistry;
