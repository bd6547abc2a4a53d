//! v003: product_pairs co-occurrence table. The CHECK enforces canonical
//! ordering at the schema level; self-pairs are unrepresentable.

use rusqlite::Connection;

use torg_core::errors::TorgResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TorgResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS product_pairs (
            product_a    TEXT NOT NULL,
            product_b    TEXT NOT NULL,
            count        INTEGER NOT NULL DEFAULT 0,
            last_updated TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (product_a, product_b),
            CHECK (product_a < product_b)
        );

        CREATE INDEX IF NOT EXISTS idx_pairs_product_b ON product_pairs(product_b);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
