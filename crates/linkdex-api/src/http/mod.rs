//! HTTP layer for linkdex.
//!
//! Axum router exposing the bare `/search` endpoint and the `/api/v1/`
//! envelope API, with CORS and request tracing.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
