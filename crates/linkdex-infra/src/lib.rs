//! Infrastructure layer for linkdex.
//!
//! Contains implementations of the ports defined in `linkdex-core`:
//! corpus sources (JSON-lines file, SQLite table), embedding providers
//! (Cohere, OpenAI-compatible) with timeout and retry wrappers, and the
//! configuration loader.

pub mod config;
pub mod embedding;
pub mod source;
