//! Axum router configuration with middleware.
//!
//! `/search` keeps the bare-array wire shape; everything else lives under
//! `/api/v1/` with the envelope format.
//! Middleware: CORS, gzip compression, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/search", get(handlers::search::search_enveloped))
        .route("/stats", get(handlers::stats::get_stats))
        .route("/reload", post(handlers::reload::reload));

    Router::new()
        .route("/search", get(handlers::search::search))
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::state::testing::{ABC_JSONL, FixedEmbedder, state_with};

    #[tokio::test]
    async fn test_router_builds_without_route_conflicts() {
        let tmp = TempDir::new().unwrap();
        let state = state_with(FixedEmbedder(vec![1.0, 0.0]), tmp.path(), ABC_JSONL).await;
        let _router = build_router(state);
    }

    #[tokio::test]
    async fn test_health_check() {
        let axum::Json(body) = health_check().await;
        assert_eq!(body["status"], "ok");
    }
}
