use serde::{Deserialize, Serialize};

/// One value bucket within a facet dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetBucket {
    pub value: String,
    pub count: usize,
}

/// Facet counts over the full matched candidate set. Computed before the
/// `max_products` truncation so the counts describe the whole matched
/// universe, not the page shown to the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub brand: Vec<FacetBucket>,
    pub color: Vec<FacetBucket>,
    pub age_bucket: Vec<FacetBucket>,
    pub seasons: Vec<FacetBucket>,
}

impl Facets {
    /// Sum of bucket counts for one dimension. In tests this equals the
    /// matched-set size for single-valued dimensions.
    pub fn total(buckets: &[FacetBucket]) -> usize {
        buckets.iter().map(|b| b.count).sum()
    }
}
