//! EmbeddingEngine, the entry point for torg-embeddings.
//!
//! Wraps the configured provider with content-hash caching and dimension
//! validation, and implements [`IEmbedder`] so the rest of the workspace
//! never sees which provider is active.

use torg_core::config::EmbeddingConfig;
use torg_core::errors::EmbeddingError;
use torg_core::traits::IEmbedder;
use torg_core::TorgResult;
use tracing::{debug, info};

use crate::cache::{content_hash, EmbeddingCache};
use crate::providers;

/// The main embedding engine.
pub struct EmbeddingEngine {
    provider: Box<dyn IEmbedder>,
    cache: EmbeddingCache,
    dimension: usize,
}

impl EmbeddingEngine {
    /// Create an engine from configuration.
    pub fn new(config: &EmbeddingConfig) -> TorgResult<Self> {
        let provider = providers::create_provider(config)?;
        let cache = EmbeddingCache::new(config.cache_capacity, config.cache_tti_secs);

        info!(
            provider = provider.name(),
            dimension = config.dimension,
            cache_capacity = config.cache_capacity,
            "embedding engine initialized"
        );

        Ok(Self {
            provider,
            cache,
            dimension: config.dimension,
        })
    }

    /// Active provider name, for logs and explain output.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Number of cached embeddings.
    pub fn cached_entries(&self) -> u64 {
        self.cache.len()
    }

    fn validate(&self, embedding: &[f32]) -> TorgResult<()> {
        if embedding.len() != self.dimension {
            return Err(EmbeddingError::WrongDimension {
                expected: self.dimension,
                actual: embedding.len(),
            }
            .into());
        }
        Ok(())
    }
}

impl IEmbedder for EmbeddingEngine {
    /// Embed one text, cache-first.
    ///
    /// Blank text short-circuits to the zero vector without touching the
    /// provider; downstream cosine comparisons score it against nothing.
    fn embed(&self, text: &str) -> TorgResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Ok(vec![0.0; self.dimension]);
        }

        let hash = content_hash(text);
        if let Some(vector) = self.cache.get(&hash) {
            debug!(hash = %hash, "embedding cache hit");
            return Ok(vector);
        }

        let embedding = self.provider.embed(text)?;
        self.validate(&embedding)?;
        self.cache.insert(hash, embedding.clone());
        Ok(embedding)
    }

    /// Embed a batch, preserving order. Only cache misses reach the
    /// provider, and blanks resolve to zero vectors locally.
    fn embed_batch(&self, texts: &[String]) -> TorgResult<Vec<Vec<f32>>> {
        let mut results: Vec<Option<Vec<f32>>> = vec![None; texts.len()];
        let mut miss_texts: Vec<String> = Vec::new();
        let mut miss_slots: Vec<usize> = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            if text.trim().is_empty() {
                results[i] = Some(vec![0.0; self.dimension]);
            } else if let Some(vector) = self.cache.get(&content_hash(text)) {
                results[i] = Some(vector);
            } else {
                miss_texts.push(text.clone());
                miss_slots.push(i);
            }
        }

        if !miss_texts.is_empty() {
            let embedded = self.provider.embed_batch(&miss_texts)?;
            if embedded.len() != miss_texts.len() {
                return Err(EmbeddingError::EmptyResponse.into());
            }
            for (slot, (text, embedding)) in miss_slots
                .into_iter()
                .zip(miss_texts.iter().zip(embedded))
            {
                self.validate(&embedding)?;
                self.cache.insert(content_hash(text), embedding.clone());
                results[slot] = Some(embedding);
            }
        }

        Ok(results.into_iter().flatten().collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}
