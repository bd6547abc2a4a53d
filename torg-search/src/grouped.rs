//! Grouped category and brand search for the consolidated response.
//!
//! Reuses the text-match primitive scoped to one dimension, then groups
//! and counts by the matched entity.

use std::collections::HashMap;

use torg_core::models::{slugify, BrandResult, CategoryResult};
use torg_core::traits::{IProductRepository, TextField};
use torg_core::TorgResult;

/// Categories whose name or slug matches the query, with product counts.
pub fn search_categories(
    repository: &dyn IProductRepository,
    normalized_query: &str,
    max: usize,
) -> TorgResult<Vec<CategoryResult>> {
    let candidates = repository.find_by_text_match(&[TextField::ProductType], normalized_query)?;

    let mut groups: HashMap<String, (String, usize)> = HashMap::new();
    for product in candidates {
        if product.product_type.is_empty() {
            continue;
        }
        let slug = product.category_slug();
        let entry = groups.entry(slug).or_insert((product.product_type, 0));
        entry.1 += 1;
    }

    let mut results: Vec<CategoryResult> = groups
        .into_iter()
        .map(|(slug, (name, product_count))| CategoryResult {
            id: slug.clone(),
            name,
            slug,
            product_count,
        })
        .collect();
    results.sort_by(|a, b| {
        b.product_count
            .cmp(&a.product_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    results.truncate(max);
    Ok(results)
}

/// Brands matching the query, with product counts.
pub fn search_brands(
    repository: &dyn IProductRepository,
    normalized_query: &str,
    max: usize,
) -> TorgResult<Vec<BrandResult>> {
    let candidates = repository.find_by_text_match(&[TextField::Brand], normalized_query)?;

    let mut groups: HashMap<String, (String, usize)> = HashMap::new();
    for product in candidates {
        if product.brand.is_empty() {
            continue;
        }
        let id = slugify(&product.brand);
        let entry = groups.entry(id).or_insert((product.brand, 0));
        entry.1 += 1;
    }

    let mut results: Vec<BrandResult> = groups
        .into_iter()
        .map(|(id, (name, product_count))| BrandResult {
            id,
            name,
            product_count,
        })
        .collect();
    results.sort_by(|a, b| {
        b.product_count
            .cmp(&a.product_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    results.truncate(max);
    Ok(results)
}
