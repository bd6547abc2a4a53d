//! CacheLayer: per-namespace single-flight caches over computed responses.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use torg_core::config::{CacheConfig, CacheNamespaceConfig};
use torg_core::errors::{TorgError, TorgResult};

use crate::fingerprint::fingerprint;

/// The three response caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheNamespace {
    Search,
    Product,
    Recommendations,
}

impl CacheNamespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Product => "product",
            Self::Recommendations => "recommendations",
        }
    }
}

/// Counters for one namespace. `entries` is moka's eventually-consistent
/// estimate, good enough for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceStats {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// Diagnostics snapshot across all namespaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub search: NamespaceStats,
    pub product: NamespaceStats,
    pub recommendations: NamespaceStats,
}

struct NamespaceCache {
    entries: Cache<String, Arc<serde_json::Value>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl NamespaceCache {
    fn new(config: CacheNamespaceConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .build();
        Self {
            entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn stats(&self) -> NamespaceStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        NamespaceStats {
            entries: self.entries.entry_count(),
            hits,
            misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }
}

/// Response cache keyed by blake3 fingerprints of (operation, parameters).
///
/// Concurrent callers with the same fingerprint share one computation.
/// Cache infrastructure faults never reach the caller: the value is
/// computed anyway and the fault is logged.
pub struct CacheLayer {
    search: NamespaceCache,
    product: NamespaceCache,
    recommendations: NamespaceCache,
}

impl CacheLayer {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            search: NamespaceCache::new(config.search),
            product: NamespaceCache::new(config.product),
            recommendations: NamespaceCache::new(config.recommendations),
        }
    }

    /// Look up `(operation, params)` in the namespace, computing and storing
    /// the value on a miss. Computation errors propagate to every waiter of
    /// the flight and are not cached.
    pub async fn get_or_compute<F, Fut>(
        &self,
        namespace: CacheNamespace,
        operation: &str,
        params: &serde_json::Value,
        compute: F,
    ) -> TorgResult<Arc<serde_json::Value>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = TorgResult<serde_json::Value>>,
    {
        let key = match fingerprint(operation, params) {
            Ok(key) => key,
            Err(err) => {
                warn!(
                    namespace = namespace.as_str(),
                    operation,
                    error = %err,
                    "cache key failed, bypassing cache"
                );
                return compute().await.map(Arc::new);
            }
        };

        let cache = self.namespace(namespace);
        if let Some(value) = cache.entries.get(&key).await {
            cache.hits.fetch_add(1, Ordering::Relaxed);
            debug!(namespace = namespace.as_str(), operation, "cache hit");
            return Ok(value);
        }
        cache.misses.fetch_add(1, Ordering::Relaxed);

        cache
            .entries
            .try_get_with(key, async move { compute().await.map(Arc::new) })
            .await
            .map_err(|shared| clone_error(&shared))
    }

    /// The fingerprint a request would be cached under. Surfaced by the
    /// query-explain endpoint.
    pub fn key_for(&self, operation: &str, params: &serde_json::Value) -> TorgResult<String> {
        fingerprint(operation, params)
    }

    /// Drop every entry in the namespace. Mutations call this so stale
    /// responses never outlive the data they were computed from.
    pub fn invalidate(&self, namespace: CacheNamespace) {
        self.namespace(namespace).entries.invalidate_all();
        debug!(namespace = namespace.as_str(), "cache invalidated");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            search: self.search.stats(),
            product: self.product.stats(),
            recommendations: self.recommendations.stats(),
        }
    }

    fn namespace(&self, namespace: CacheNamespace) -> &NamespaceCache {
        match namespace {
            CacheNamespace::Search => &self.search,
            CacheNamespace::Product => &self.product,
            CacheNamespace::Recommendations => &self.recommendations,
        }
    }
}

/// Rebuild a shareable error for single-flight waiters. The variants the
/// HTTP layer maps specially survive; everything else flattens to Internal.
fn clone_error(err: &TorgError) -> TorgError {
    match err {
        TorgError::Validation { message } => TorgError::validation(message.clone()),
        TorgError::NotFound { kind, id } => TorgError::not_found(*kind, id.clone()),
        TorgError::RecommenderNotReady => TorgError::RecommenderNotReady,
        other => TorgError::internal(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tiny_ttl_config() -> CacheConfig {
        CacheConfig {
            search: CacheNamespaceConfig {
                capacity: 16,
                ttl_secs: 1,
            },
            ..CacheConfig::default()
        }
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let layer = CacheLayer::new(&CacheConfig::default());
        let params = json!({"id": "p1"});

        let first = layer
            .get_or_compute(CacheNamespace::Product, "get-product", &params, || async {
                Ok(json!("v1"))
            })
            .await
            .unwrap();
        let second = layer
            .get_or_compute(CacheNamespace::Product, "get-product", &params, || async {
                Ok(json!("v2"))
            })
            .await
            .unwrap();

        assert_eq!(*first, json!("v1"));
        assert_eq!(*second, json!("v1"));

        let stats = layer.stats();
        assert_eq!(stats.product.hits, 1);
        assert_eq!(stats.product.misses, 1);
        assert!((stats.product.hit_rate - 0.5).abs() < 1e-9);
        assert_eq!(stats.search.hits + stats.search.misses, 0);
    }

    #[tokio::test]
    async fn concurrent_identical_requests_share_one_computation() {
        let layer = Arc::new(CacheLayer::new(&CacheConfig::default()));
        let calls = Arc::new(AtomicU64::new(0));
        let params = json!({"query": "jakke"});

        let mut handles = Vec::new();
        for _ in 0..8 {
            let layer = Arc::clone(&layer);
            let calls = Arc::clone(&calls);
            let params = params.clone();
            handles.push(tokio::spawn(async move {
                layer
                    .get_or_compute(CacheNamespace::Search, "search", &params, || async move {
                        calls.fetch_add(1, Ordering::Relaxed);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(json!({"hits": 3}))
                    })
                    .await
                    .unwrap()
            }));
        }
        for handle in handles {
            assert_eq!(*handle.await.unwrap(), json!({"hits": 3}));
        }
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn invalidation_is_scoped_to_the_namespace() {
        let layer = CacheLayer::new(&CacheConfig::default());
        let params = json!({"id": "p1"});

        for namespace in [CacheNamespace::Product, CacheNamespace::Search] {
            layer
                .get_or_compute(namespace, "op", &params, || async { Ok(json!("v1")) })
                .await
                .unwrap();
        }

        layer.invalidate(CacheNamespace::Product);

        let product = layer
            .get_or_compute(CacheNamespace::Product, "op", &params, || async {
                Ok(json!("v2"))
            })
            .await
            .unwrap();
        let search = layer
            .get_or_compute(CacheNamespace::Search, "op", &params, || async {
                Ok(json!("v2"))
            })
            .await
            .unwrap();

        assert_eq!(*product, json!("v2"));
        assert_eq!(*search, json!("v1"));
    }

    #[tokio::test]
    async fn entries_expire_after_the_namespace_ttl() {
        let layer = CacheLayer::new(&tiny_ttl_config());
        let params = json!({"query": "lue"});

        layer
            .get_or_compute(CacheNamespace::Search, "search", &params, || async {
                Ok(json!("v1"))
            })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1100)).await;
        let after = layer
            .get_or_compute(CacheNamespace::Search, "search", &params, || async {
                Ok(json!("v2"))
            })
            .await
            .unwrap();

        assert_eq!(*after, json!("v2"));
    }

    #[tokio::test]
    async fn compute_errors_propagate_and_are_not_cached() {
        let layer = CacheLayer::new(&CacheConfig::default());
        let params = json!({"query": "x"});

        let err = layer
            .get_or_compute(CacheNamespace::Search, "search", &params, || async {
                Err(TorgError::validation("query too short"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TorgError::Validation { .. }));

        let value = layer
            .get_or_compute(CacheNamespace::Search, "search", &params, || async {
                Ok(json!("recovered"))
            })
            .await
            .unwrap();
        assert_eq!(*value, json!("recovered"));
    }

    #[tokio::test]
    async fn not_found_survives_the_flight_boundary() {
        let layer = CacheLayer::new(&CacheConfig::default());
        let params = json!({"id": "ghost"});

        let err = layer
            .get_or_compute(CacheNamespace::Product, "get-product", &params, || async {
                Err(TorgError::not_found("product", "ghost"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TorgError::NotFound { .. }));
    }
}
