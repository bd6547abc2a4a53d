//! Seasonal and commercial post-scoring boosts for similar-product results.

use torg_core::config::RecommendConfig;
use torg_core::models::Product;

/// Additive score boosts applied after the base algorithm has scored its
/// candidates. Season relevancy comes from the product itself; stock and
/// sale boosts are flat configured values.
#[derive(Debug, Clone)]
pub struct SeasonalBooster {
    in_stock_boost: f64,
    on_sale_boost: f64,
}

impl SeasonalBooster {
    pub fn new(config: &RecommendConfig) -> Self {
        Self {
            in_stock_boost: config.in_stock_boost,
            on_sale_boost: config.on_sale_boost,
        }
    }

    /// The boost for one product given the season in effect.
    pub fn boost(&self, product: &Product, current_season: Option<&str>) -> f64 {
        let mut boost = 0.0;
        if let Some(season) = current_season {
            if product
                .seasons
                .iter()
                .any(|s| s.eq_ignore_ascii_case(season))
            {
                boost += product.season_relevancy_factor;
            }
        }
        if product.stock_level > 0 {
            boost += self.in_stock_boost;
        }
        if product.is_on_sale {
            boost += self.on_sale_boost;
        }
        boost
    }

    /// Apply boosts in place and re-rank. Boosting can reorder candidates,
    /// so callers truncate after this, not before.
    pub fn apply(&self, scored: &mut [(Product, f64)], current_season: Option<&str>) {
        for (product, score) in scored.iter_mut() {
            *score += self.boost(product, current_season);
        }
        crate::collaborative::rank_scored(scored);
    }
}
