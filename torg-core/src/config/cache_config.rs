use serde::{Deserialize, Serialize};

use super::defaults;

/// Capacity and TTL for one cache namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheNamespaceConfig {
    pub capacity: u64,
    pub ttl_secs: u64,
}

impl Default for CacheNamespaceConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::DEFAULT_SEARCH_CACHE_CAPACITY,
            ttl_secs: defaults::DEFAULT_SEARCH_CACHE_TTL_SECS,
        }
    }
}

/// Cache layer configuration, one section per namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub search: CacheNamespaceConfig,
    pub product: CacheNamespaceConfig,
    pub recommendations: CacheNamespaceConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            search: CacheNamespaceConfig {
                capacity: defaults::DEFAULT_SEARCH_CACHE_CAPACITY,
                ttl_secs: defaults::DEFAULT_SEARCH_CACHE_TTL_SECS,
            },
            product: CacheNamespaceConfig {
                capacity: defaults::DEFAULT_PRODUCT_CACHE_CAPACITY,
                ttl_secs: defaults::DEFAULT_PRODUCT_CACHE_TTL_SECS,
            },
            recommendations: CacheNamespaceConfig {
                capacity: defaults::DEFAULT_RECOMMENDATIONS_CACHE_CAPACITY,
                ttl_secs: defaults::DEFAULT_RECOMMENDATIONS_CACHE_TTL_SECS,
            },
        }
    }
}
