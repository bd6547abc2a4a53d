//! Orderline persistence and order-history aggregates.

use rusqlite::{params, Connection, OptionalExtension};

use torg_core::errors::TorgResult;
use torg_core::models::Orderline;

use crate::to_storage_err;

/// Insert a line. Returns false when `(order_nr, product_nr)` already
/// exists; a replayed line must not form new pairs.
pub fn insert_orderline(conn: &Connection, line: &Orderline) -> TorgResult<bool> {
    let changed = conn
        .execute(
            "INSERT OR IGNORE INTO orderlines
                (order_nr, product_nr, customer_nr, season_name, date_time)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                line.order_nr,
                line.product_nr,
                line.customer_nr,
                line.season_name,
                line.date_time.to_rfc3339(),
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed > 0)
}

/// Distinct product ids within one order, sorted.
pub fn products_in_order(conn: &Connection, order_nr: &str) -> TorgResult<Vec<String>> {
    collect_ids(
        conn,
        "SELECT DISTINCT product_nr FROM orderlines WHERE order_nr = ?1 ORDER BY product_nr",
        order_nr,
    )
}

/// Distinct product ids ever purchased by a customer, sorted.
pub fn purchased_products(conn: &Connection, customer_nr: &str) -> TorgResult<Vec<String>> {
    collect_ids(
        conn,
        "SELECT DISTINCT product_nr FROM orderlines WHERE customer_nr = ?1 ORDER BY product_nr",
        customer_nr,
    )
}

/// The customer's most recent purchase, if any.
pub fn latest_purchase(conn: &Connection, customer_nr: &str) -> TorgResult<Option<String>> {
    conn.query_row(
        "SELECT product_nr FROM orderlines WHERE customer_nr = ?1
         ORDER BY date_time DESC, product_nr ASC LIMIT 1",
        params![customer_nr],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Every order with its distinct product ids, for the full recompute.
pub fn all_order_groups(conn: &Connection) -> TorgResult<Vec<(String, Vec<String>)>> {
    let mut stmt = conn
        .prepare("SELECT order_nr, product_nr FROM orderlines ORDER BY order_nr, product_nr")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for row in rows {
        let (order_nr, product_nr) = row.map_err(|e| to_storage_err(e.to_string()))?;
        match groups.last_mut() {
            Some((current, products)) if *current == order_nr => products.push(product_nr),
            _ => groups.push((order_nr, vec![product_nr])),
        }
    }
    Ok(groups)
}

pub fn orderline_count(conn: &Connection) -> TorgResult<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM orderlines", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as u64)
}

/// Most frequent season name across all orderlines, if any.
pub fn dominant_season(conn: &Connection) -> TorgResult<Option<String>> {
    conn.query_row(
        "SELECT season_name FROM orderlines WHERE season_name <> ''
         GROUP BY season_name ORDER BY COUNT(*) DESC, season_name ASC LIMIT 1",
        [],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

fn collect_ids(conn: &Connection, sql: &str, param: &str) -> TorgResult<Vec<String>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![param], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut ids = Vec::new();
    for row in rows {
        ids.push(row.map_err(|e| to_storage_err(e.to_string()))?);
    }
    Ok(ids)
}
