//! Result fusion: dedup across strategies, then rank.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use torg_core::constants::SCORE_EPSILON;
use torg_core::models::ProductHit;

/// Fuse per-strategy hit lists into one deduplicated, ranked list.
///
/// Each product id keeps exactly one hit: the higher-scored one, or on an
/// epsilon tie the one from the higher-precedence strategy (exact over
/// ngram over vector). The result is the full pre-truncation set; callers
/// truncate after faceting.
pub fn fuse(lists: Vec<Vec<ProductHit>>) -> Vec<ProductHit> {
    let mut best: HashMap<String, ProductHit> = HashMap::new();

    for hit in lists.into_iter().flatten() {
        match best.entry(hit.product.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(hit);
            }
            Entry::Occupied(mut slot) => {
                if replaces(&hit, slot.get()) {
                    slot.insert(hit);
                }
            }
        }
    }

    let mut fused: Vec<ProductHit> = best.into_values().collect();
    rank_hits(&mut fused);
    fused
}

/// Ranking order: score descending, stock level descending, id ascending.
pub fn rank_hits(hits: &mut [ProductHit]) {
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.product.stock_level.cmp(&a.product.stock_level))
            .then_with(|| a.product.id.cmp(&b.product.id))
    });
}

fn replaces(challenger: &ProductHit, incumbent: &ProductHit) -> bool {
    if (challenger.score - incumbent.score).abs() <= SCORE_EPSILON {
        challenger.match_type.precedence() < incumbent.match_type.precedence()
    } else {
        challenger.score > incumbent.score
    }
}
