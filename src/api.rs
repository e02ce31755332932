use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::article::{validate_batch, Article, ArticleCluster, Bias, ScoringResult, Source};
use crate::category::{cluster_matches, Category};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::overrides::{OverrideTable, TrustOverride};
use crate::pipeline::{build_clusters, PipelineContext};
use crate::recap::{build_recap, RecapSummary};
use crate::scoring::factcheck::{FactCheckIndex, FactCheckResult, Verdict};
use crate::scoring::validity::ValidityScorer;
use crate::source_registry::SourceRegistry;
use crate::trust_baseline::{baselines_for_batch, TrustBaseline};

#[derive(Clone)]
pub struct AppState {
    registry: Arc<RwLock<SourceRegistry>>,
    overrides: Arc<OverrideTable>,
    config: Arc<EngineConfig>,
}

impl AppState {
    pub fn new(config: EngineConfig, registry: SourceRegistry, overrides: OverrideTable) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            overrides: Arc::new(overrides),
            config: Arc::new(config),
        }
    }

    /// Engine config, source registry and overrides from their env paths / defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = EngineConfig::from_env().context("loading engine config")?;
        let registry = SourceRegistry::from_env();
        let overrides = OverrideTable::from_env();
        info!(
            target: "veritas",
            threshold = config.clustering.threshold,
            sources = registry.len(),
            overrides = overrides.len(),
            "engine state ready"
        );
        Ok(Self::new(config, registry, overrides))
    }

    fn resolve_source(&self, input: SourceInput) -> Source {
        let mut src = match self.registry.read() {
            Ok(r) => r.resolve(&input.domain),
            Err(_) => Source::neutral(&input.domain),
        };
        if let Some(id) = input.id {
            src.id = id;
        }
        if let Some(name) = input.name {
            src.name = name;
        }
        if let Some(bias) = input.bias {
            src.bias = bias;
        }
        if let Some(rating) = input.factual_rating {
            src.factual_rating = rating.min(100);
        }
        src
    }

    fn articles(&self, inputs: Vec<ArticleInput>) -> Vec<Article> {
        inputs.into_iter().map(|a| a.into_article(self)).collect()
    }

    fn run(&self, req: ClusterRequest) -> Result<(Vec<ArticleCluster>, DateTime<Utc>), ApiError> {
        let now = req.now.unwrap_or_else(Utc::now);
        let articles = self.articles(req.articles);
        let fact_checks = to_index(req.fact_checks);
        let ctx = PipelineContext::new(&self.config, now)
            .with_overrides(self.overrides.as_ref())
            .with_fact_checks(&fact_checks);
        let clusters = build_clusters(&articles, &ctx)?;
        Ok((clusters, now))
    }

    /// Runs the CPU-bound pipeline off the async workers.
    async fn run_blocking(
        &self,
        req: ClusterRequest,
    ) -> Result<(Vec<ArticleCluster>, DateTime<Utc>), ApiError> {
        let state = self.clone();
        tokio::task::spawn_blocking(move || state.run(req))
            .await
            .map_err(|e| ApiError::Worker(e.to_string()))?
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/clusters", post(clusters))
        .route("/score", post(score))
        .route("/recap", post(recap))
        .route("/baseline", post(baseline))
        .route("/sources", get(sources))
        .route("/debug/source", get(debug_source))
        .route("/admin/reload-sources", get(admin_reload_sources))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// ---------- request DTOs ----------

/// Caller-supplied outlet. Anything left out comes from the registry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceInput {
    #[serde(default)]
    domain: String,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    bias: Option<Bias>,
    #[serde(default)]
    factual_rating: Option<u8>,
}

// Required fields default to empty so the engine reports them as MissingField
// instead of a generic deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleInput {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    source: SourceInput,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    sentiment: f64,
}

impl ArticleInput {
    fn into_article(self, state: &AppState) -> Article {
        Article {
            id: self.id,
            title: self.title,
            url: self.url,
            source: state.resolve_source(self.source),
            published_at: self.published_at,
            summary: self.summary,
            sentiment: self.sentiment,
            validity_score: 0,
            corroboration_count: 0,
            scoring_breakdown: None,
        }
    }
}

/// Fact-check evidence as publishers write it: `rating` is either a verdict
/// name (`MOSTLY_TRUE`) or free text (`"Pants on Fire"`).
#[derive(Debug, Deserialize)]
struct FactCheckInput {
    #[serde(default)]
    claim: String,
    rating: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    url: String,
}

impl From<FactCheckInput> for FactCheckResult {
    fn from(f: FactCheckInput) -> Self {
        FactCheckResult {
            claim: f.claim,
            rating: parse_verdict(&f.rating),
            source: f.source,
            url: f.url,
        }
    }
}

fn parse_verdict(raw: &str) -> Verdict {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
        .unwrap_or_else(|_| Verdict::from_textual(raw))
}

fn to_index(raw: HashMap<String, Vec<FactCheckInput>>) -> FactCheckIndex {
    raw.into_iter()
        .map(|(id, list)| (id, list.into_iter().map(FactCheckResult::from).collect()))
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClusterRequest {
    articles: Vec<ArticleInput>,
    /// Keyed by article id.
    #[serde(default)]
    fact_checks: HashMap<String, Vec<FactCheckInput>>,
    /// Reference time; defaults to the server clock.
    #[serde(default)]
    now: Option<DateTime<Utc>>,
    /// Only honoured by `/clusters`; empty keeps every cluster.
    #[serde(default)]
    categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScoreRequest {
    article: ArticleInput,
    #[serde(default)]
    siblings: Vec<ArticleInput>,
    #[serde(default)]
    fact_checks: Vec<FactCheckInput>,
}

// ---------- errors ----------

pub enum ApiError {
    Engine(EngineError),
    /// The blocking pipeline task panicked or was cancelled.
    Worker(String),
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError::Engine(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Engine(e) if e.is_input_error() => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Engine(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Worker(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("pipeline worker failed: {msg}"),
            ),
        };
        warn!(target: "veritas", status = status.as_u16(), error = %message, "request failed");
        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

// ---------- handlers ----------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClustersResp {
    generated_at: DateTime<Utc>,
    clusters: Vec<ArticleCluster>,
}

async fn clusters(
    State(state): State<AppState>,
    Json(body): Json<ClusterRequest>,
) -> Result<Json<ClustersResp>, ApiError> {
    let selected: HashSet<Category> = body.categories.iter().copied().collect();
    let (mut clusters, now) = state.run_blocking(body).await?;
    clusters.retain(|c| cluster_matches(c, &selected));
    Ok(Json(ClustersResp {
        generated_at: now,
        clusters,
    }))
}

async fn score(
    State(state): State<AppState>,
    Json(body): Json<ScoreRequest>,
) -> Result<Json<ScoringResult>, ApiError> {
    // Position 0 is the scored article, siblings follow.
    let mut batch = vec![body.article.into_article(&state)];
    batch.extend(state.articles(body.siblings));
    validate_batch(&batch)?;
    let (article, siblings) = batch.split_at(1);
    let article = &article[0];
    let sibling_refs: Vec<&Article> = siblings.iter().collect();
    let evidence: Vec<FactCheckResult> = body.fact_checks.into_iter().map(Into::into).collect();

    let overrides: &dyn TrustOverride = state.overrides.as_ref();
    let scorer = ValidityScorer::new(&state.config.validity, overrides);
    Ok(Json(scorer.score(article, &sibling_refs, &evidence)))
}

async fn recap(
    State(state): State<AppState>,
    Json(body): Json<ClusterRequest>,
) -> Result<Json<RecapSummary>, ApiError> {
    let (clusters, now) = state.run_blocking(body).await?;
    Ok(Json(build_recap(&clusters, now)))
}

async fn baseline(
    State(state): State<AppState>,
    Json(body): Json<ClusterRequest>,
) -> Result<Json<Vec<TrustBaseline>>, ApiError> {
    let (clusters, _) = state.run_blocking(body).await?;
    Ok(Json(baselines_for_batch(&clusters)))
}

async fn sources(State(state): State<AppState>) -> Json<Vec<Source>> {
    let list = match state.registry.read() {
        Ok(r) => r.sources_by_reliability(),
        Err(_) => Vec::new(),
    };
    Json(list)
}

async fn debug_source(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> String {
    let d = q.get("domain").cloned().unwrap_or_default();
    let (src, known) = match state.registry.read() {
        Ok(r) => (r.resolve(&d), r.lookup(&d).is_some()),
        Err(_) => (Source::neutral(&d), false),
    };
    let effective = state
        .overrides
        .effective_rating(src.factual_rating, &src.domain);
    format!(
        "domain='{}' known={} name='{}' bias={:?} rating={} effective={}",
        src.domain, known, src.name, src.bias, src.factual_rating, effective
    )
}

async fn admin_reload_sources(State(state): State<AppState>) -> String {
    let fresh = SourceRegistry::from_env();
    let n = fresh.len();
    match state.registry.write() {
        Ok(mut w) => {
            *w = fresh;
            info!(target: "veritas", sources = n, "source registry reloaded");
            format!("reloaded {n} sources")
        }
        Err(_) => "failed: lock poisoned".to_string(),
    }
}
