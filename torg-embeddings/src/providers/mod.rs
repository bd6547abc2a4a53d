//! Embedding providers.
//!
//! One provider is active at a time: the HTTP provider when an endpoint is
//! configured, otherwise the deterministic local hasher.

mod hash_provider;
mod http_provider;

pub use hash_provider::HashProvider;
pub use http_provider::HttpProvider;

use torg_core::config::EmbeddingConfig;
use torg_core::traits::IEmbedder;
use torg_core::TorgResult;

/// Create the provider selected by configuration.
pub fn create_provider(config: &EmbeddingConfig) -> TorgResult<Box<dyn IEmbedder>> {
    match &config.endpoint {
        Some(endpoint) => Ok(Box::new(HttpProvider::new(
            endpoint.clone(),
            config.dimension,
            config.timeout_ms,
        )?)),
        None => Ok(Box::new(HashProvider::new(config.dimension))),
    }
}
