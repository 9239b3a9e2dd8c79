//! Search engine core for linkdex.
//!
//! This crate owns the in-memory corpus, the cosine ranker and the search
//! service, and defines the ports (`Embedder`, `CorpusSource`) that the
//! infrastructure layer implements. It depends only on `linkdex-types` --
//! never on `linkdex-infra` or any network/IO crate.

pub mod corpus;
pub mod embedding;
pub mod search;
