//! In-memory embedding cache using moka.
//!
//! TinyLFU admission, bounded capacity, idle expiry. Keys are blake3
//! content hashes so identical texts share one entry regardless of which
//! call path produced them.

use std::time::Duration;

use moka::sync::Cache;

/// Hard upper bound on entry lifetime, independent of idle expiry.
const MAX_ENTRY_TTL_SECS: u64 = 86_400;

/// Bounded in-memory embedding cache.
pub struct EmbeddingCache {
    cache: Cache<String, Vec<f32>>,
}

impl EmbeddingCache {
    /// Create a cache holding at most `capacity` embeddings, each expiring
    /// after `tti_secs` without access.
    pub fn new(capacity: u64, tti_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(Duration::from_secs(tti_secs))
            .time_to_live(Duration::from_secs(MAX_ENTRY_TTL_SECS))
            .build();

        Self { cache }
    }

    /// Get an embedding by content hash.
    pub fn get(&self, content_hash: &str) -> Option<Vec<f32>> {
        self.cache.get(content_hash)
    }

    /// Insert an embedding keyed by content hash.
    pub fn insert(&self, content_hash: String, embedding: Vec<f32>) {
        self.cache.insert(content_hash, embedding);
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

/// Content hash used as the cache key for a text.
pub fn content_hash(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let cache = EmbeddingCache::new(100, 60);
        let key = content_hash("winter jacket");
        cache.insert(key.clone(), vec![1.0, 2.0]);
        assert_eq!(cache.get(&key), Some(vec![1.0, 2.0]));
    }

    #[test]
    fn miss_returns_none() {
        let cache = EmbeddingCache::new(100, 60);
        assert_eq!(cache.get("absent"), None);
    }

    #[test]
    fn content_hash_is_stable() {
        assert_eq!(content_hash("vinterjakke"), content_hash("vinterjakke"));
        assert_ne!(content_hash("vinterjakke"), content_hash("sommerjakke"));
    }
}
