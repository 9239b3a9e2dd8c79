//! POST /api/v1/reload - rebuild the corpus from the configured source.
//!
//! The new corpus is validated in full before it replaces the old one. On
//! failure the previous corpus keeps serving and the error is returned as
//! 422 `CORPUS_LOAD_ERROR`.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, request_id};
use crate::state::AppState;

pub async fn reload(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let started = Instant::now();
    let report = state.search_service.reload(state.source.as_ref()).await?;

    let data = serde_json::json!({
        "source": report.source,
        "loaded": report.loaded,
        "skipped": report.skipped,
        "dimension": report.dimension,
        "loaded_at": report.loaded_at.to_rfc3339(),
    });

    Ok(Json(
        ApiResponse::success(data, request_id(), started)
            .with_link("self", "/api/v1/reload")
            .with_link("stats", "/api/v1/stats"),
    ))
}
