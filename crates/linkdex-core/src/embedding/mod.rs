//! Embedding provider port.
//!
//! The `Embedder` trait is the single point where the search pipeline
//! depends on an external service. Concrete providers (Cohere,
//! OpenAI-compatible) and transport wrappers (timeout, retry) live in
//! linkdex-infra.

pub mod box_embedder;
pub mod embedder;

pub use self::box_embedder::BoxEmbedder;
pub use self::embedder::Embedder;
