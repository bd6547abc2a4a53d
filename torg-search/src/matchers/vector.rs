//! Vector strategy: embed the query, scan stored embeddings.
//!
//! A product is scored by the better of its title and description
//! similarity. Embedder failures propagate to the engine, which degrades
//! the strategy rather than the request.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use torg_core::models::{EmbeddingField, MatchType, Product, ProductHit};
use torg_core::traits::{IEmbedder, IProductRepository};
use torg_core::TorgResult;

use crate::fuser;

/// Cosine matcher against the stored catalog embeddings.
pub struct VectorMatcher {
    threshold: f64,
    k: usize,
}

impl VectorMatcher {
    pub fn new(threshold: f64, k: usize) -> Self {
        Self { threshold, k }
    }

    pub fn run(
        &self,
        repository: &dyn IProductRepository,
        embedder: &dyn IEmbedder,
        normalized_query: &str,
    ) -> TorgResult<Vec<ProductHit>> {
        let embedding = embedder.embed(normalized_query)?;
        if embedding.iter().all(|v| *v == 0.0) {
            return Ok(Vec::new());
        }

        let mut best: HashMap<String, (Product, f64)> = HashMap::new();
        for field in [EmbeddingField::Title, EmbeddingField::Description] {
            for (product, similarity) in
                repository.find_by_vector_similarity(&embedding, field, self.k)?
            {
                match best.entry(product.id.clone()) {
                    Entry::Occupied(mut slot) => {
                        let entry = slot.get_mut();
                        if similarity > entry.1 {
                            entry.1 = similarity;
                        }
                    }
                    Entry::Vacant(slot) => {
                        slot.insert((product, similarity));
                    }
                }
            }
        }

        let mut hits: Vec<ProductHit> = best
            .into_values()
            .filter(|(_, similarity)| *similarity > self.threshold)
            .map(|(product, similarity)| ProductHit::new(product, similarity, MatchType::Vector))
            .collect();

        fuser::rank_hits(&mut hits);
        hits.truncate(self.k);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use torg_core::errors::EmbeddingError;

    struct FailingEmbedder;

    impl IEmbedder for FailingEmbedder {
        fn embed(&self, _text: &str) -> TorgResult<Vec<f32>> {
            Err(EmbeddingError::Timeout { timeout_ms: 1 }.into())
        }

        fn embed_batch(&self, _texts: &[String]) -> TorgResult<Vec<Vec<f32>>> {
            Err(EmbeddingError::Timeout { timeout_ms: 1 }.into())
        }

        fn dimension(&self) -> usize {
            4
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct ZeroEmbedder;

    impl IEmbedder for ZeroEmbedder {
        fn embed(&self, _text: &str) -> TorgResult<Vec<f32>> {
            Ok(vec![0.0; 4])
        }

        fn embed_batch(&self, texts: &[String]) -> TorgResult<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.0; 4]).collect())
        }

        fn dimension(&self) -> usize {
            4
        }

        fn name(&self) -> &str {
            "zero"
        }
    }

    struct PanicRepository;

    impl IProductRepository for PanicRepository {
        fn upsert_product(&self, _product: &Product) -> TorgResult<()> {
            unreachable!()
        }
        fn get_product(&self, _id: &str) -> TorgResult<Option<Product>> {
            unreachable!()
        }
        fn delete_product(&self, _id: &str) -> TorgResult<bool> {
            unreachable!()
        }
        fn delete_all_products(&self) -> TorgResult<u64> {
            unreachable!()
        }
        fn all_products(&self) -> TorgResult<Vec<Product>> {
            unreachable!()
        }
        fn product_count(&self) -> TorgResult<u64> {
            unreachable!()
        }
        fn find_by_text_match(
            &self,
            _fields: &[torg_core::traits::TextField],
            _pattern: &str,
        ) -> TorgResult<Vec<Product>> {
            unreachable!()
        }
        fn find_by_vector_similarity(
            &self,
            _vector: &[f32],
            _field: EmbeddingField,
            _k: usize,
        ) -> TorgResult<Vec<(Product, f64)>> {
            unreachable!("repository must not be queried")
        }
    }

    #[test]
    fn embedder_failure_propagates() {
        let matcher = VectorMatcher::new(0.5, 10);
        let result = matcher.run(&PanicRepository, &FailingEmbedder, "winter jacket");
        assert!(result.is_err());
    }

    #[test]
    fn zero_embedding_short_circuits() {
        let matcher = VectorMatcher::new(0.5, 10);
        let hits = matcher
            .run(&PanicRepository, &ZeroEmbedder, "winter jacket")
            .unwrap();
        assert!(hits.is_empty());
    }
}
