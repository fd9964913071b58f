//! API route definitions and router builder.

pub mod analysis;
pub mod health;
pub mod logs;
pub mod search;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::state::AppState;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(allowed))
}

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState, config: &ApiConfig) -> Router {
    let api = Router::new()
        // Ingestion
        .route("/logs/upload", post(logs::upload))
        .route("/logs/supported-types", get(logs::supported_types))
        // Analysis
        .route("/analysis/statistics", get(analysis::statistics))
        .route("/analysis/anomalies", get(analysis::anomalies))
        // Search
        .route("/search", get(search::search))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}
