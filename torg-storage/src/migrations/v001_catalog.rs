//! v001: products table with embedded vectors.

use rusqlite::Connection;

use torg_core::errors::TorgResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TorgResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS products (
            id                      TEXT PRIMARY KEY,
            title                   TEXT NOT NULL,
            description             TEXT NOT NULL DEFAULT '',
            brand                   TEXT NOT NULL DEFAULT '',
            color                   TEXT NOT NULL DEFAULT '',
            age_bucket              TEXT NOT NULL DEFAULT '',
            product_type            TEXT NOT NULL DEFAULT '',
            seasons                 TEXT NOT NULL DEFAULT '[]',
            season_relevancy_factor REAL NOT NULL DEFAULT 0,
            price_original          REAL NOT NULL DEFAULT 0,
            price_current           REAL NOT NULL DEFAULT 0,
            is_on_sale              INTEGER NOT NULL DEFAULT 0,
            stock_level             INTEGER NOT NULL DEFAULT 0,
            title_embedding         BLOB,
            description_embedding   BLOB,
            embedding_dimensions    INTEGER,
            updated_at              TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_products_brand ON products(brand);
        CREATE INDEX IF NOT EXISTS idx_products_color ON products(color);
        CREATE INDEX IF NOT EXISTS idx_products_product_type ON products(product_type);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
