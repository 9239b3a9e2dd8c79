//! Shared domain types for linkdex.
//!
//! Link records, ranked search results, configuration and the error
//! taxonomy shared by the core, infrastructure and API crates.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod record;
