//! Substring text scan used by the exact and ngram strategies.
//!
//! A leading-wildcard LIKE is a full table scan in SQLite either way, and
//! its lower() only folds ASCII. The scan therefore pulls rows and does the
//! case folding in Rust, which keeps æ/ø/å matching correct.

use rusqlite::Connection;

use torg_core::errors::TorgResult;
use torg_core::models::Product;
use torg_core::traits::TextField;

use super::product_crud::{row_to_product, PRODUCT_COLUMNS};
use crate::to_storage_err;

/// Case-insensitive substring scan over the given fields.
pub fn find_by_text_match(
    conn: &Connection,
    fields: &[TextField],
    pattern: &str,
) -> TorgResult<Vec<Product>> {
    if fields.is_empty() || pattern.is_empty() {
        return Ok(vec![]);
    }
    let needle = pattern.to_lowercase();

    let mut stmt = conn
        .prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], row_to_product)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut matched = Vec::new();
    for row in rows {
        let product = row.map_err(|e| to_storage_err(e.to_string()))?;
        let hit = fields
            .iter()
            .any(|field| field_text(&product, *field).to_lowercase().contains(&needle));
        if hit {
            matched.push(product);
        }
    }
    Ok(matched)
}

fn field_text(product: &Product, field: TextField) -> &str {
    match field {
        TextField::Title => &product.title,
        TextField::Description => &product.description,
        TextField::Brand => &product.brand,
        TextField::ProductType => &product.product_type,
    }
}
