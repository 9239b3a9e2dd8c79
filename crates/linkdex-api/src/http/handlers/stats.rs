//! GET /api/v1/stats - statistics for the corpus being served.

use std::time::Instant;

use axum::Json;
use axum::extract::State;

use linkdex_types::record::CorpusStats;

use crate::http::response::{ApiResponse, request_id};
use crate::state::AppState;

pub async fn get_stats(State(state): State<AppState>) -> Json<ApiResponse<CorpusStats>> {
    let started = Instant::now();
    let stats = state.search_service.stats().await;

    Json(
        ApiResponse::success(stats, request_id(), started)
            .with_link("self", "/api/v1/stats")
            .with_link("search", "/api/v1/search"),
    )
}
