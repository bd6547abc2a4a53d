//! Configuration. Every tunable lives here with serde defaults, so a
//! partial TOML file (or none at all) yields a working configuration.

pub mod defaults;

mod cache_config;
mod embedding_config;
mod recommend_config;
mod search_config;
mod storage_config;

pub use cache_config::{CacheConfig, CacheNamespaceConfig};
pub use embedding_config::EmbeddingConfig;
pub use recommend_config::RecommendConfig;
pub use search_config::SearchConfig;
pub use storage_config::StorageConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{TorgError, TorgResult};

/// Root configuration, composed of per-subsystem sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TorgConfig {
    pub search: SearchConfig,
    pub recommend: RecommendConfig,
    pub cache: CacheConfig,
    pub embedding: EmbeddingConfig,
    pub storage: StorageConfig,
}

impl TorgConfig {
    /// Parse a TOML document. Missing sections and fields fall back to
    /// defaults.
    pub fn from_toml(text: &str) -> TorgResult<Self> {
        toml::from_str(text).map_err(|e| TorgError::Validation {
            message: format!("invalid config: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = TorgConfig::from_toml("").unwrap();
        assert_eq!(config.search.max_products, defaults::DEFAULT_MAX_PRODUCTS);
        assert_eq!(config.cache.search.ttl_secs, defaults::DEFAULT_SEARCH_CACHE_TTL_SECS);
        assert_eq!(
            config.recommend.collaborative_weight,
            defaults::DEFAULT_COLLABORATIVE_WEIGHT
        );
    }

    #[test]
    fn partial_section_overrides_only_named_fields() {
        let config = TorgConfig::from_toml(
            "[search]\nmax_products = 50\n\n[cache.search]\nttl_secs = 60\n",
        )
        .unwrap();
        assert_eq!(config.search.max_products, 50);
        assert_eq!(config.search.max_brands, defaults::DEFAULT_MAX_BRANDS);
        assert_eq!(config.cache.search.ttl_secs, 60);
        assert_eq!(
            config.cache.search.capacity,
            defaults::DEFAULT_SEARCH_CACHE_CAPACITY
        );
        assert_eq!(
            config.cache.product.ttl_secs,
            defaults::DEFAULT_PRODUCT_CACHE_TTL_SECS
        );
    }

    #[test]
    fn malformed_toml_is_a_validation_error() {
        let err = TorgConfig::from_toml("[search\nmax_products = 50").unwrap_err();
        assert!(matches!(err, TorgError::Validation { .. }));
    }
}
