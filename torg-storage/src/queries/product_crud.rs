//! Product CRUD and row mapping.

use rusqlite::{params, Connection, OptionalExtension, Row};

use torg_core::errors::TorgResult;
use torg_core::models::Product;

use super::vector_search::{bytes_to_f32_vec, f32_vec_to_bytes};
use crate::to_storage_err;

/// Column list every product SELECT uses, in [`row_to_product`] order.
pub(crate) const PRODUCT_COLUMNS: &str =
    "id, title, description, brand, color, age_bucket, product_type, seasons, \
     season_relevancy_factor, price_original, price_current, is_on_sale, stock_level, \
     title_embedding, description_embedding";

/// Map a row selected with [`PRODUCT_COLUMNS`] into a Product.
pub(crate) fn row_to_product(row: &Row<'_>) -> rusqlite::Result<Product> {
    let seasons_json: String = row.get(7)?;
    let seasons: Vec<String> = serde_json::from_str(&seasons_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let title_blob: Option<Vec<u8>> = row.get(13)?;
    let description_blob: Option<Vec<u8>> = row.get(14)?;
    Ok(Product {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        brand: row.get(3)?,
        color: row.get(4)?,
        age_bucket: row.get(5)?,
        product_type: row.get(6)?,
        seasons,
        season_relevancy_factor: row.get(8)?,
        price_original: row.get(9)?,
        price_current: row.get(10)?,
        is_on_sale: row.get(11)?,
        stock_level: row.get(12)?,
        title_embedding: title_blob.map(|b| bytes_to_f32_vec(&b)),
        description_embedding: description_blob.map(|b| bytes_to_f32_vec(&b)),
    })
}

/// Insert or replace a product by id.
pub fn upsert_product(conn: &Connection, product: &Product) -> TorgResult<()> {
    let seasons_json = serde_json::to_string(&product.seasons)?;
    let title_blob = product.title_embedding.as_deref().map(f32_vec_to_bytes);
    let description_blob = product.description_embedding.as_deref().map(f32_vec_to_bytes);
    let dimensions: Option<i64> = product
        .title_embedding
        .as_ref()
        .or(product.description_embedding.as_ref())
        .map(|v| v.len() as i64);

    conn.execute(
        "INSERT INTO products (
            id, title, description, brand, color, age_bucket, product_type, seasons,
            season_relevancy_factor, price_original, price_current, is_on_sale, stock_level,
            title_embedding, description_embedding, embedding_dimensions
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
         ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            brand = excluded.brand,
            color = excluded.color,
            age_bucket = excluded.age_bucket,
            product_type = excluded.product_type,
            seasons = excluded.seasons,
            season_relevancy_factor = excluded.season_relevancy_factor,
            price_original = excluded.price_original,
            price_current = excluded.price_current,
            is_on_sale = excluded.is_on_sale,
            stock_level = excluded.stock_level,
            title_embedding = excluded.title_embedding,
            description_embedding = excluded.description_embedding,
            embedding_dimensions = excluded.embedding_dimensions,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
        params![
            product.id,
            product.title,
            product.description,
            product.brand,
            product.color,
            product.age_bucket,
            product.product_type,
            seasons_json,
            product.season_relevancy_factor,
            product.price_original,
            product.price_current,
            product.is_on_sale,
            product.stock_level,
            title_blob,
            description_blob,
            dimensions,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Fetch a single product by id.
pub fn get_product(conn: &Connection, id: &str) -> TorgResult<Option<Product>> {
    conn.query_row(
        &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
        params![id],
        row_to_product,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Delete a product. Returns false when the id was unknown.
pub fn delete_product(conn: &Connection, id: &str) -> TorgResult<bool> {
    let changed = conn
        .execute("DELETE FROM products WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed > 0)
}

/// Delete every product, returning how many were removed.
pub fn delete_all_products(conn: &Connection) -> TorgResult<u64> {
    let changed = conn
        .execute("DELETE FROM products", [])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed as u64)
}

/// Every product, ordered by id for determinism.
pub fn all_products(conn: &Connection) -> TorgResult<Vec<Product>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], row_to_product)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut products = Vec::new();
    for row in rows {
        products.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(products)
}

pub fn product_count(conn: &Connection) -> TorgResult<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as u64)
}
