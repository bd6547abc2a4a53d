//! Collaborative scoring from co-occurrence pair counts.

use std::collections::HashSet;

use torg_core::errors::TorgResult;
use torg_core::models::Product;
use torg_core::traits::{IOrderRepository, IPairRepository, IProductRepository};

/// Rank products a customer has not bought by how often they co-occur with
/// products the customer has bought. Pair counts around every purchased
/// product are accumulated onto the other pair member; already-purchased
/// candidates are excluded.
pub fn recommend_for_customer(
    products: &dyn IProductRepository,
    orders: &dyn IOrderRepository,
    pairs: &dyn IPairRepository,
    customer_nr: &str,
    limit: usize,
) -> TorgResult<Vec<(Product, f64)>> {
    let purchased = orders.purchased_products(customer_nr)?;
    if purchased.is_empty() {
        return Ok(Vec::new());
    }
    let owned: HashSet<&str> = purchased.iter().map(String::as_str).collect();

    let mut scored = Vec::new();
    for (candidate, count) in pairs.aggregate_pairs_for_products(&purchased)? {
        if owned.contains(candidate.as_str()) {
            continue;
        }
        if let Some(product) = products.get_product(&candidate)? {
            scored.push((product, count as f64));
        }
    }
    rank_scored(&mut scored);
    scored.truncate(limit);
    Ok(scored)
}

/// Rank products by raw pair count around a single seed product.
pub fn frequently_bought_with(
    products: &dyn IProductRepository,
    pairs: &dyn IPairRepository,
    product_id: &str,
    limit: usize,
) -> TorgResult<Vec<(Product, f64)>> {
    let mut scored = Vec::new();
    for pair in pairs.pairs_for_product(product_id)? {
        let Some(other) = pair.other(product_id) else {
            continue;
        };
        if let Some(product) = products.get_product(other)? {
            scored.push((product, pair.count as f64));
        }
    }
    rank_scored(&mut scored);
    scored.truncate(limit);
    Ok(scored)
}

/// Deterministic ordering for scored products: score desc, then stock desc,
/// then id asc.
pub(crate) fn rank_scored(scored: &mut [(Product, f64)]) {
    scored.sort_by(|(pa, sa), (pb, sb)| {
        sb.partial_cmp(sa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| pb.stock_level.cmp(&pa.stock_level))
            .then_with(|| pa.id.cmp(&pb.id))
    });
}
