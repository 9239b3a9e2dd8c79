//! Search endpoints.
//!
//! GET /search?term=...&limit=...        - bare JSON array of `{url, title, date}`
//! GET /api/v1/search?term=...&limit=... - same results inside the envelope
//!
//! A missing or blank `term` returns every record in load order. `limit`
//! truncates after ranking; without it `[server] default_limit` applies, and
//! without that the full ranking is returned.

use std::time::Instant;

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use linkdex_types::record::RankedResult;

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, request_id};
use crate::state::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub term: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchData {
    pub term: String,
    /// Records in the corpus snapshot that answered the query.
    pub total: usize,
    pub results: Vec<RankedResult>,
}

/// GET /search - results as a bare JSON array.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<RankedResult>>, AppError> {
    let (_, results) = run_search(&state, &query).await?;
    Ok(Json(results))
}

/// GET /api/v1/search - results inside the envelope.
pub async fn search_enveloped(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchData>>, AppError> {
    let started = Instant::now();
    let (total, results) = run_search(&state, &query).await?;

    let data = SearchData {
        term: query.term.unwrap_or_default(),
        total,
        results,
    };
    let resp = ApiResponse::success(data, request_id(), started)
        .with_link("self", "/api/v1/search")
        .with_link("stats", "/api/v1/stats");

    Ok(Json(resp))
}

async fn run_search(
    state: &AppState,
    query: &SearchQuery,
) -> Result<(usize, Vec<RankedResult>), AppError> {
    let limit = query.limit.or(state.config.server.default_limit);
    if limit == Some(0) {
        return Err(AppError::Validation("limit must be at least 1".to_string()));
    }

    let term = query.term.as_deref().unwrap_or("");
    let mut results = state.search_service.search(term).await?;
    let total = results.len();

    if let Some(limit) = limit {
        results.truncate(limit);
    }
    Ok((total, results))
}
