//! Content scoring: weighted embedding similarity plus categorical boosts.

use torg_core::config::RecommendConfig;
use torg_core::errors::TorgResult;
use torg_core::models::{EmbeddingField, Product};
use torg_core::traits::IProductRepository;
use torg_embeddings::cosine_similarity;

/// Scores catalog products against a seed product. Title and description
/// embeddings contribute weighted cosine similarity; matching product type
/// and brand add flat boosts. Products without stored embeddings still rank
/// through the categorical boosts alone.
#[derive(Debug, Clone)]
pub struct ContentScorer {
    title_weight: f64,
    description_weight: f64,
    category_boost: f64,
    brand_boost: f64,
}

impl ContentScorer {
    pub fn new(config: &RecommendConfig) -> Self {
        Self {
            title_weight: config.title_weight,
            description_weight: config.description_weight,
            category_boost: config.category_boost,
            brand_boost: config.brand_boost,
        }
    }

    /// Rank the catalog against `seed`, excluding the seed itself and
    /// anything that shares no signal with it at all.
    pub fn similar_to(
        &self,
        products: &dyn IProductRepository,
        seed: &Product,
        limit: usize,
    ) -> TorgResult<Vec<(Product, f64)>> {
        let mut scored = Vec::new();
        for candidate in products.all_products()? {
            if candidate.id == seed.id {
                continue;
            }
            let score = self.score(seed, &candidate);
            if score > 0.0 {
                scored.push((candidate, score));
            }
        }
        crate::collaborative::rank_scored(&mut scored);
        scored.truncate(limit);
        Ok(scored)
    }

    /// Weighted similarity of `candidate` to `seed`.
    pub fn score(&self, seed: &Product, candidate: &Product) -> f64 {
        let mut score = self.title_weight * field_similarity(seed, candidate, EmbeddingField::Title)
            + self.description_weight
                * field_similarity(seed, candidate, EmbeddingField::Description);
        if !seed.product_type.is_empty() && seed.product_type == candidate.product_type {
            score += self.category_boost;
        }
        if !seed.brand.is_empty() && seed.brand == candidate.brand {
            score += self.brand_boost;
        }
        score
    }
}

fn field_similarity(seed: &Product, candidate: &Product, field: EmbeddingField) -> f64 {
    match (seed.embedding(field), candidate.embedding(field)) {
        (Some(a), Some(b)) => f64::from(cosine_similarity(a, b)),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, brand: &str, product_type: &str, title_emb: Option<Vec<f32>>) -> Product {
        Product {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            brand: brand.into(),
            color: String::new(),
            age_bucket: String::new(),
            product_type: product_type.into(),
            seasons: Vec::new(),
            season_relevancy_factor: 0.0,
            price_original: 100.0,
            price_current: 100.0,
            is_on_sale: false,
            stock_level: 1,
            title_embedding: title_emb,
            description_embedding: None,
        }
    }

    #[test]
    fn identical_title_embedding_scores_full_title_weight() {
        let scorer = ContentScorer::new(&RecommendConfig::default());
        let seed = product("seed", "", "", Some(vec![1.0, 0.0, 0.0]));
        let twin = product("twin", "", "", Some(vec![1.0, 0.0, 0.0]));
        let unrelated = product("other", "", "", Some(vec![0.0, 1.0, 0.0]));

        assert!((scorer.score(&seed, &twin) - 3.0).abs() < 1e-9);
        assert!(scorer.score(&seed, &unrelated).abs() < 1e-9);
    }

    #[test]
    fn category_and_brand_matches_add_flat_boosts() {
        let scorer = ContentScorer::new(&RecommendConfig::default());
        let seed = product("seed", "NordicWear", "Jackets", None);
        let same_both = product("a", "NordicWear", "Jackets", None);
        let same_brand = product("b", "NordicWear", "Boots", None);

        assert!((scorer.score(&seed, &same_both) - 10.0).abs() < 1e-9);
        assert!((scorer.score(&seed, &same_brand) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn empty_seed_fields_never_match() {
        let scorer = ContentScorer::new(&RecommendConfig::default());
        let seed = product("seed", "", "", None);
        let candidate = product("a", "", "", None);

        assert_eq!(scorer.score(&seed, &candidate), 0.0);
    }
}
