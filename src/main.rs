//! Veritas story-clustering service. Binary entrypoint.
//! Boots the Axum HTTP server: engine state, routes, metrics, tracing.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use veritas_engine::api::{create_router, AppState};
use veritas_engine::metrics::Metrics;

/// Compact logs by default, JSON lines when `VERITAS_LOG_JSON=1`.
/// `RUST_LOG` wins over the built-in filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("veritas=info,warn"));
    let json = std::env::var("VERITAS_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    // try_init: the platform may already have installed a global subscriber.
    let _ = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let state = AppState::from_env()?;
    let metrics = Metrics::init()?;

    let router = create_router(state).merge(metrics.router());
    Ok(router.into())
}
