use serde::{Deserialize, Serialize};

use super::product::Product;

/// Which strategy produced a search result.
///
/// Closed set. Precedence (exact over ngram over vector) resolves fusion
/// ties when two strategies score the same product within epsilon, keeping
/// rankings explainable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Ngram,
    Vector,
}

impl MatchType {
    /// Lower rank wins when scores are within epsilon.
    pub fn precedence(self) -> u8 {
        match self {
            MatchType::Exact => 0,
            MatchType::Ngram => 1,
            MatchType::Vector => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Ngram => "ngram",
            MatchType::Vector => "vector",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored candidate from one match strategy. Ephemeral, per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCandidate {
    pub product_id: String,
    pub score: f64,
    pub match_type: MatchType,
}

/// A fused search hit carrying the full product document. Serializes with
/// the product fields inlined, plus `score` and `matchType`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductHit {
    #[serde(flatten)]
    pub product: Product,
    pub score: f64,
    pub match_type: MatchType,
}

impl ProductHit {
    pub fn new(product: Product, score: f64, match_type: MatchType) -> Self {
        Self {
            product,
            score,
            match_type,
        }
    }

    /// Slim projection without the product document.
    pub fn candidate(&self) -> SearchCandidate {
        SearchCandidate {
            product_id: self.product.id.clone(),
            score: self.score,
            match_type: self.match_type,
        }
    }
}
