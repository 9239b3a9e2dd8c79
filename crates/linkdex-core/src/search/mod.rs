//! Query pipeline: cosine ranking and the search service that drives it.

pub mod ranker;
pub mod service;

pub use self::ranker::{Scored, cosine_similarity, rank};
pub use self::service::SearchService;
