//! Hybrid blending of collaborative and content scores.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use torg_core::config::RecommendConfig;
use torg_core::models::{Product, RecommendationScore};

/// Blends two independently scored candidate lists into one ranking.
///
/// Raw collaborative counts and content similarities live on different
/// scales, so each side is min-max normalized to [0, 1] before the weighted
/// combination. A product present on only one side contributes 0 for the
/// missing component.
#[derive(Debug, Clone)]
pub struct HybridBlender {
    collaborative_weight: f64,
    content_weight: f64,
}

impl HybridBlender {
    pub fn new(config: &RecommendConfig) -> Self {
        Self {
            collaborative_weight: config.collaborative_weight,
            content_weight: config.content_weight,
        }
    }

    /// Merge the two lists by product id and rank by blended score.
    /// Ties break on-sale first, then stock desc, then id asc.
    pub fn blend(
        &self,
        collaborative: Vec<(Product, f64)>,
        content: Vec<(Product, f64)>,
    ) -> Vec<(Product, RecommendationScore)> {
        let collaborative_norm = normalize(&collaborative);
        let content_norm = normalize(&content);

        let mut merged: HashMap<String, (Product, RecommendationScore)> = HashMap::new();
        for ((product, _), norm) in collaborative.into_iter().zip(collaborative_norm) {
            let score = RecommendationScore::collaborative(product.id.clone(), norm);
            merged.insert(product.id.clone(), (product, score));
        }
        for ((product, _), norm) in content.into_iter().zip(content_norm) {
            match merged.entry(product.id.clone()) {
                Entry::Occupied(mut occupied) => occupied.get_mut().1.content_score = norm,
                Entry::Vacant(vacant) => {
                    let score = RecommendationScore::content(product.id.clone(), norm);
                    vacant.insert((product, score));
                }
            }
        }

        let mut blended: Vec<(Product, RecommendationScore)> = merged.into_values().collect();
        for (_, score) in blended.iter_mut() {
            score.hybrid_score = self.collaborative_weight * score.collaborative_score
                + self.content_weight * score.content_score;
        }
        blended.sort_by(|(pa, sa), (pb, sb)| {
            sb.hybrid_score
                .partial_cmp(&sa.hybrid_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| pb.is_on_sale.cmp(&pa.is_on_sale))
                .then_with(|| pb.stock_level.cmp(&pa.stock_level))
                .then_with(|| pa.id.cmp(&pb.id))
        });
        blended
    }
}

/// Min-max normalize scores to [0, 1]. A list whose scores are all equal
/// normalizes to 1.0 for every entry; an empty list stays empty.
fn normalize(scored: &[(Product, f64)]) -> Vec<f64> {
    if scored.is_empty() {
        return Vec::new();
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (_, score) in scored {
        min = min.min(*score);
        max = max.max(*score);
    }
    if (max - min).abs() < f64::EPSILON {
        return vec![1.0; scored.len()];
    }
    scored
        .iter()
        .map(|(_, score)| (score - min) / (max - min))
        .collect()
}
