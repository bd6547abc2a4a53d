//! # torg-core
//!
//! Foundation crate for the torg search-and-recommendation service.
//! Defines the data model, collaborator traits, errors, config, and
//! constants. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::TorgConfig;
pub use errors::{TorgError, TorgResult};
pub use models::{MatchType, Orderline, Product, ProductHit, ProductPair, SearchCandidate};
