//! Canonical co-occurrence pair persistence.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use torg_core::errors::TorgResult;
use torg_core::models::{canonical_key, ProductPair};
use torg_core::TorgError;

use crate::to_storage_err;

/// Upsert the canonical pair for `(a, b)`, adding `delta` to its count.
/// Inputs are canonicalized here; passing them in either order is fine.
pub fn upsert_pair(conn: &Connection, a: &str, b: &str, delta: i64) -> TorgResult<()> {
    let (lo, hi) = canonical_key(a, b)
        .ok_or_else(|| TorgError::validation("cannot pair a product with itself"))?;
    conn.execute(
        "INSERT INTO product_pairs (product_a, product_b, count, last_updated)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(product_a, product_b) DO UPDATE SET
            count = count + excluded.count,
            last_updated = excluded.last_updated",
        params![lo, hi, delta, Utc::now().to_rfc3339()],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Accumulated co-occurrence counts around the given products, keyed by the
/// other pair member, descending by total.
pub fn aggregate_pairs_for_products(
    conn: &Connection,
    product_ids: &[String],
) -> TorgResult<Vec<(String, i64)>> {
    if product_ids.is_empty() {
        return Ok(vec![]);
    }
    let placeholders = vec!["?"; product_ids.len()].join(", ");
    let sql = format!(
        "SELECT other, SUM(count) AS total FROM (
            SELECT product_b AS other, count FROM product_pairs
             WHERE product_a IN ({placeholders})
            UNION ALL
            SELECT product_a AS other, count FROM product_pairs
             WHERE product_b IN ({placeholders})
         ) GROUP BY other
         ORDER BY total DESC, other ASC"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(
            rusqlite::params_from_iter(product_ids.iter().chain(product_ids.iter())),
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut totals = Vec::new();
    for row in rows {
        totals.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(totals)
}

/// Pairs containing the given product, either side, by count descending.
pub fn pairs_for_product(conn: &Connection, product_id: &str) -> TorgResult<Vec<ProductPair>> {
    let mut stmt = conn
        .prepare(
            "SELECT product_a, product_b, count, last_updated FROM product_pairs
             WHERE product_a = ?1 OR product_b = ?1
             ORDER BY count DESC, product_a ASC, product_b ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![product_id], |row| {
            let last_updated: String = row.get(3)?;
            let parsed = DateTime::parse_from_rfc3339(&last_updated)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?
                .with_timezone(&Utc);
            Ok(ProductPair {
                product_a: row.get(0)?,
                product_b: row.get(1)?,
                count: row.get(2)?,
                last_updated: parsed,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut pairs = Vec::new();
    for row in rows {
        pairs.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(pairs)
}

pub fn pair_count(conn: &Connection) -> TorgResult<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM product_pairs", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as u64)
}

/// Drop every pair; the full recompute starts from an empty table.
pub fn clear_pairs(conn: &Connection) -> TorgResult<()> {
    conn.execute("DELETE FROM product_pairs", [])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
