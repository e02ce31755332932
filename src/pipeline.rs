//! # Cluster Pipeline
//! Pure batch transform: `Article` batch → ranked `ArticleCluster` batch.
//! No I/O, no shared state across calls; `now` is an explicit input.
//!
//! Order:
//! 1) validate the batch (fail fast on a malformed article)
//! 2) optional sentiment fill
//! 3) TF-IDF vectors over the whole batch → seed grouping
//! 4) per cluster (in parallel): topic label, validity scoring, aggregate scores, categories
//! 5) stable sort by cluster score, descending

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info};

use crate::article::{validate_batch, Article, ArticleCluster, Source};
use crate::category::{cluster_search_text, detect_categories};
use crate::cluster::{group_by_seed, top_keywords, topic_label, vectorize};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::metrics::ensure_metrics_described;
use crate::overrides::{NoOverride, TrustOverride};
use crate::scoring::aggregate::{score_cluster, time_bounds};
use crate::scoring::factcheck::{FactCheckIndex, FactCheckResult};
use crate::scoring::validity::ValidityScorer;
use crate::sentiment::SentimentAnalyzer;

/// Everything a run needs besides the articles.
pub struct PipelineContext<'a> {
    pub config: &'a EngineConfig,
    pub overrides: &'a dyn TrustOverride,
    pub fact_checks: &'a FactCheckIndex,
    /// Reference time for freshness.
    pub now: DateTime<Utc>,
}

static NO_FACT_CHECKS: Lazy<FactCheckIndex> = Lazy::new(FactCheckIndex::new);

impl<'a> PipelineContext<'a> {
    /// No overrides, no fact-check evidence.
    pub fn new(config: &'a EngineConfig, now: DateTime<Utc>) -> Self {
        Self {
            config,
            overrides: &NoOverride,
            fact_checks: &NO_FACT_CHECKS,
            now,
        }
    }

    pub fn with_overrides(mut self, overrides: &'a dyn TrustOverride) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_fact_checks(mut self, fact_checks: &'a FactCheckIndex) -> Self {
        self.fact_checks = fact_checks;
        self
    }

    fn evidence_for(&self, article_id: &str) -> &[FactCheckResult] {
        self.fact_checks
            .get(article_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Cluster, score, and rank one batch.
pub fn build_clusters(articles: &[Article], ctx: &PipelineContext<'_>) -> Result<Vec<ArticleCluster>> {
    ensure_metrics_described();
    let started = Instant::now();
    if let Err(e) = validate_batch(articles) {
        counter!("engine_validation_errors_total").increment(1);
        return Err(e);
    }
    if articles.is_empty() {
        return Ok(Vec::new());
    }

    let mut batch = articles.to_vec();
    if ctx.config.fill_sentiment {
        SentimentAnalyzer::new().fill_missing(&mut batch);
    }

    let docs: Vec<(String, String)> = batch.iter().map(|a| (a.id.clone(), a.text())).collect();
    let vectors = vectorize(&docs);
    let groups = group_by_seed(&vectors, ctx.config.clustering.threshold);
    drop(vectors);

    let mut clusters: Vec<ArticleCluster> = groups
        .into_par_iter()
        .enumerate()
        .filter(|(_, idxs)| !idxs.is_empty())
        .map(|(position, idxs)| {
            let members: Vec<&Article> = idxs.iter().map(|&i| &batch[i]).collect();
            assemble_cluster(position, &members, ctx)
        })
        .collect();

    // Stable: equal scores keep discovery order.
    clusters.sort_by(|a, b| b.score.cmp(&a.score));

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    counter!("engine_articles_total").increment(articles.len() as u64);
    counter!("engine_clusters_total").increment(clusters.len() as u64);
    histogram!("engine_run_ms").record(elapsed_ms);
    info!(
        target: "veritas",
        articles = articles.len(),
        clusters = clusters.len(),
        elapsed_ms,
        "batch clustered"
    );

    Ok(clusters)
}

fn assemble_cluster(position: usize, members: &[&Article], ctx: &PipelineContext<'_>) -> ArticleCluster {
    let cfg = ctx.config;

    let docs: Vec<(String, String)> = members.iter().map(|a| (a.id.clone(), a.text())).collect();
    let keywords = top_keywords(&docs, cfg.clustering.keyword_count);
    let topic = topic_label(&keywords, &cfg.clustering.label_separator, position);

    let scorer = ValidityScorer::new(&cfg.validity, ctx.overrides);
    let scored: Vec<Article> = members
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let siblings: Vec<&Article> = members
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, a)| *a)
                .collect();
            let result = scorer.score(article, &siblings, ctx.evidence_for(&article.id));

            let mut out = (*article).clone();
            out.validity_score = result.overall;
            out.corroboration_count = members.len() as u32;
            out.scoring_breakdown = Some(result);
            out
        })
        .collect();

    let scores = score_cluster(&scored, ctx.now, &cfg.cluster);
    let (first_seen, last_updated) = time_bounds(&scored);
    let sources = unique_sources(&scored);
    let categories = detect_categories(&cluster_search_text(
        &topic,
        scored.iter().map(|a| a.title.as_str()),
    ));

    debug!(
        target: "veritas",
        position,
        topic = %topic,
        members = scored.len(),
        score = scores.score,
        "cluster scored"
    );

    ArticleCluster {
        id: format!("cluster-{}-{}", slugify(&topic), position),
        topic,
        article_count: scored.len(),
        articles: scored,
        avg_validity: scores.trust_aggregate,
        sources,
        freshness: scores.freshness,
        velocity: scores.velocity,
        source_diversity: scores.source_diversity,
        trust_aggregate: scores.trust_aggregate,
        score: scores.score,
        first_seen,
        last_updated,
        categories,
    }
}

/// Deduplicated by domain, first-seen order.
fn unique_sources(articles: &[Article]) -> Vec<Source> {
    let mut seen = HashSet::new();
    articles
        .iter()
        .filter(|a| seen.insert(a.source.domain.clone()))
        .map(|a| a.source.clone())
        .collect()
}

static RE_NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("slug regex"));

fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    RE_NON_SLUG
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Convenience wrapper: default context (no overrides, no fact checks).
pub fn build_clusters_at(articles: &[Article], config: &EngineConfig, now: DateTime<Utc>) -> Result<Vec<ArticleCluster>> {
    build_clusters(articles, &PipelineContext::new(config, now))
}
