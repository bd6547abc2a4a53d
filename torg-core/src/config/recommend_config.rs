use serde::{Deserialize, Serialize};

use super::defaults;

/// Recommendation scoring configuration. The weights are deliberate
/// defaults, not constants; operators tune them per catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Weight on title-embedding similarity in content scoring.
    pub title_weight: f64,
    /// Weight on description-embedding similarity in content scoring.
    pub description_weight: f64,
    /// Additive boost for an exact product-type match.
    pub category_boost: f64,
    /// Additive boost for an exact brand match.
    pub brand_boost: f64,
    /// Hybrid blend weight on the collaborative component.
    pub collaborative_weight: f64,
    /// Hybrid blend weight on the content component.
    pub content_weight: f64,
    /// Default result count for recommendation endpoints.
    pub default_limit: usize,
    /// Hard cap on requested result counts.
    pub max_limit: usize,
    /// Additive boost for products with stock on hand.
    pub in_stock_boost: f64,
    /// Additive boost for products on sale.
    pub on_sale_boost: f64,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            title_weight: defaults::DEFAULT_TITLE_WEIGHT,
            description_weight: defaults::DEFAULT_DESCRIPTION_WEIGHT,
            category_boost: defaults::DEFAULT_CATEGORY_BOOST,
            brand_boost: defaults::DEFAULT_BRAND_BOOST,
            collaborative_weight: defaults::DEFAULT_COLLABORATIVE_WEIGHT,
            content_weight: defaults::DEFAULT_CONTENT_WEIGHT,
            default_limit: defaults::DEFAULT_RECOMMEND_LIMIT,
            max_limit: defaults::MAX_RECOMMEND_LIMIT,
            in_stock_boost: defaults::DEFAULT_IN_STOCK_BOOST,
            on_sale_boost: defaults::DEFAULT_ON_SALE_BOOST,
        }
    }
}
