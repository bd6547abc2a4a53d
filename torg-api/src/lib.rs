//! torg-api: the HTTP surface over the torg engines.
//!
//! One composition root ([`runtime::TorgRuntime`]) wires storage,
//! embeddings, search, recommendations, cache and metrics together; the
//! axum router exposes them. Handlers stay thin: extract, call an engine
//! through the cache layer, shape the response DTO.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod runtime;

pub use error::ApiError;
pub use routes::router;
pub use runtime::TorgRuntime;
