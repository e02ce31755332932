// src/metrics.rs
use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

fn describe_engine_metrics() {
    describe_counter!("engine_articles_total", "Articles accepted into cluster runs.");
    describe_counter!("engine_clusters_total", "Clusters produced across runs.");
    describe_counter!(
        "engine_validation_errors_total",
        "Batches rejected for a malformed article."
    );
    describe_histogram!("engine_run_ms", "Cluster run wall time in milliseconds.");
}

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(describe_engine_metrics);
}

impl Metrics {
    /// Install the Prometheus recorder. Fails if another recorder is already global.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        // Describe against this recorder even if a run already happened without one.
        describe_engine_metrics();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
