use serde::{Deserialize, Serialize};

use super::product::Product;

/// Per-product recommendation scores. Derived per request, never persisted;
/// the hybrid blender fills all three components, single-source scorers
/// leave the missing component at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationScore {
    pub product_id: String,
    pub collaborative_score: f64,
    pub content_score: f64,
    pub hybrid_score: f64,
}

impl RecommendationScore {
    pub fn collaborative(product_id: impl Into<String>, score: f64) -> Self {
        Self {
            product_id: product_id.into(),
            collaborative_score: score,
            content_score: 0.0,
            hybrid_score: 0.0,
        }
    }

    pub fn content(product_id: impl Into<String>, score: f64) -> Self {
        Self {
            product_id: product_id.into(),
            collaborative_score: 0.0,
            content_score: score,
            hybrid_score: 0.0,
        }
    }
}

/// A recommended product as served to callers: the document plus the final
/// ranking score for the requested algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub score: f64,
}
