//! HTTP request handlers.

pub mod reload;
pub mod search;
pub mod stats;
