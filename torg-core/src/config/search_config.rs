use serde::{Deserialize, Serialize};

use super::defaults;

/// Search pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Default cap on grouped category results.
    pub max_categories: usize,
    /// Default cap on grouped brand results.
    pub max_brands: usize,
    /// Default cap on fused product results.
    pub max_products: usize,
    /// Per-strategy candidate cap before fusion.
    pub strategy_cap: usize,
    /// Minimum gram size for substring matching.
    pub ngram_min: usize,
    /// Maximum gram size for substring matching.
    pub ngram_max: usize,
    /// Cosine similarity floor for vector candidates.
    pub vector_similarity_threshold: f64,
    /// Vector candidates fetched per embedding field.
    pub vector_k: usize,
    /// Timeout for a single strategy task (milliseconds).
    pub strategy_timeout_ms: u64,
    /// Request-scoped timeout for the whole strategy join (milliseconds).
    pub request_timeout_ms: u64,
    /// Default autosuggest result count.
    pub suggest_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_categories: defaults::DEFAULT_MAX_CATEGORIES,
            max_brands: defaults::DEFAULT_MAX_BRANDS,
            max_products: defaults::DEFAULT_MAX_PRODUCTS,
            strategy_cap: defaults::DEFAULT_STRATEGY_CAP,
            ngram_min: defaults::DEFAULT_NGRAM_MIN,
            ngram_max: defaults::DEFAULT_NGRAM_MAX,
            vector_similarity_threshold: defaults::DEFAULT_VECTOR_SIMILARITY_THRESHOLD,
            vector_k: defaults::DEFAULT_VECTOR_K,
            strategy_timeout_ms: defaults::DEFAULT_STRATEGY_TIMEOUT_MS,
            request_timeout_ms: defaults::DEFAULT_REQUEST_TIMEOUT_MS,
            suggest_limit: defaults::DEFAULT_SUGGEST_LIMIT,
        }
    }
}
