//! torg-embeddings: embedding providers behind a single engine.
//!
//! The engine wraps one provider (a remote HTTP service or the
//! deterministic local hasher), validates dimensions, and caches query
//! embeddings in a bounded in-memory tier keyed by content hash.

pub mod cache;
pub mod engine;
pub mod providers;
pub mod similarity;

pub use engine::EmbeddingEngine;
pub use providers::{HashProvider, HttpProvider};
pub use similarity::cosine_similarity;
