use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Vector dimension every provider must produce.
    pub dimension: usize,
    /// HTTP endpoint of the embedding service. When unset, the deterministic
    /// local provider is used.
    pub endpoint: Option<String>,
    /// Outbound request timeout (milliseconds).
    pub timeout_ms: u64,
    /// L1 query-embedding cache capacity (entries).
    pub cache_capacity: u64,
    /// L1 cache idle expiry (seconds).
    pub cache_tti_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: defaults::DEFAULT_EMBEDDING_DIMENSION,
            endpoint: None,
            timeout_ms: defaults::DEFAULT_EMBED_TIMEOUT_MS,
            cache_capacity: defaults::DEFAULT_EMBED_CACHE_CAPACITY,
            cache_tti_secs: defaults::DEFAULT_EMBED_CACHE_TTI_SECS,
        }
    }
}
