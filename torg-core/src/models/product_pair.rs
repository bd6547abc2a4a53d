use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical unordered co-occurrence pair.
///
/// Invariant: `product_a < product_b` lexicographically, and self-pairs are
/// unrepresentable through [`ProductPair::canonical`]. `count` only grows
/// under incremental updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPair {
    pub product_a: String,
    pub product_b: String,
    pub count: i64,
    pub last_updated: DateTime<Utc>,
}

impl ProductPair {
    /// Build the canonical pair for two product ids. `None` for self-pairs.
    pub fn canonical(x: &str, y: &str, count: i64, last_updated: DateTime<Utc>) -> Option<Self> {
        let (a, b) = canonical_key(x, y)?;
        Some(Self {
            product_a: a.to_string(),
            product_b: b.to_string(),
            count,
            last_updated,
        })
    }

    /// Given one member of the pair, the other one.
    pub fn other(&self, product_id: &str) -> Option<&str> {
        if self.product_a == product_id {
            Some(&self.product_b)
        } else if self.product_b == product_id {
            Some(&self.product_a)
        } else {
            None
        }
    }
}

/// Order two product ids canonically. `None` for self-pairs.
pub fn canonical_key<'a>(x: &'a str, y: &'a str) -> Option<(&'a str, &'a str)> {
    match x.cmp(y) {
        std::cmp::Ordering::Less => Some((x, y)),
        std::cmp::Ordering::Greater => Some((y, x)),
        std::cmp::Ordering::Equal => None,
    }
}
