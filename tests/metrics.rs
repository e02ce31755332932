// tests/metrics.rs
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use tower::ServiceExt;

use veritas_engine::metrics::Metrics;
use veritas_engine::{build_clusters_at, Article, EngineConfig};

fn article(id: &str, title: &str) -> Article {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": title,
        "source": { "id": "npr", "name": "NPR", "domain": "npr.org", "bias": "LEFT_CENTER", "factualRating": 88 },
        "publishedAt": "2025-06-10T08:00:00Z"
    }))
    .expect("article json")
}

// One test per process: the Prometheus recorder is global.
#[tokio::test]
async fn metrics_endpoint_contains_engine_series() {
    let metrics = Metrics::init().expect("install recorder");
    let now = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
    let cfg = EngineConfig::default();

    let ok = vec![article("a", "Storm hits coast"), article("b", "Coast storm damage")];
    build_clusters_at(&ok, &cfg, now).expect("valid batch");
    let bad = vec![article("a", "Storm"), article("a", "Storm again")];
    assert!(build_clusters_at(&bad, &cfg, now).is_err());

    let resp = metrics
        .router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    let text = String::from_utf8(body.to_vec()).unwrap();

    for needle in [
        "engine_articles_total",
        "engine_clusters_total",
        "engine_validation_errors_total",
        "engine_run_ms",
    ] {
        assert!(text.contains(needle), "missing series {needle} in:\n{text}");
    }
}
