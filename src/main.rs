//! Skillscope — Binary Entrypoint
//! Boots the Axum HTTP server: catalog load, shared state, routes, metrics.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use skillscope::api::{self, AppState};
use skillscope::catalog::OpportunityCatalog;
use skillscope::metrics::Metrics;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - SKILLSCOPE_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("SKILLSCOPE_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("skillscope=info,responder=debug,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments. Enables
    // CATALOG_CONFIG_PATH overrides without shell exports.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    // Catalog load is fatal on validation errors: a partially valid catalog
    // must never serve matches.
    let catalog = OpportunityCatalog::from_env_or_default()
        .expect("Failed to load opportunity catalog");

    let metrics = Metrics::init(catalog.len());

    let state = AppState {
        catalog: Arc::new(catalog),
    };
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
