//! Facet aggregation over the pre-truncation matched set.

use std::collections::HashMap;

use torg_core::models::{FacetBucket, Facets, ProductHit};

/// Aggregate facets for the full matched set, before truncation. Buckets
/// sort by count descending, value ascending on ties.
pub fn aggregate(hits: &[ProductHit]) -> Facets {
    let mut brand: HashMap<String, usize> = HashMap::new();
    let mut color: HashMap<String, usize> = HashMap::new();
    let mut age_bucket: HashMap<String, usize> = HashMap::new();
    let mut seasons: HashMap<String, usize> = HashMap::new();

    for hit in hits {
        let p = &hit.product;
        count(&mut brand, &p.brand);
        count(&mut color, &p.color);
        count(&mut age_bucket, &p.age_bucket);
        for season in &p.seasons {
            count(&mut seasons, season);
        }
    }

    Facets {
        brand: into_buckets(brand),
        color: into_buckets(color),
        age_bucket: into_buckets(age_bucket),
        seasons: into_buckets(seasons),
    }
}

fn count(map: &mut HashMap<String, usize>, value: &str) {
    if !value.is_empty() {
        *map.entry(value.to_string()).or_default() += 1;
    }
}

fn into_buckets(map: HashMap<String, usize>) -> Vec<FacetBucket> {
    let mut buckets: Vec<FacetBucket> = map
        .into_iter()
        .map(|(value, count)| FacetBucket { value, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    buckets
}
