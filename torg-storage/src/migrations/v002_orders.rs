//! v002: orderlines table. The (order_nr, product_nr) primary key makes
//! replayed ingestion a no-op, which the pair index relies on.

use rusqlite::Connection;

use torg_core::errors::TorgResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> TorgResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS orderlines (
            order_nr    TEXT NOT NULL,
            product_nr  TEXT NOT NULL,
            customer_nr TEXT NOT NULL,
            season_name TEXT NOT NULL DEFAULT '',
            date_time   TEXT NOT NULL,
            PRIMARY KEY (order_nr, product_nr)
        );

        CREATE INDEX IF NOT EXISTS idx_orderlines_customer ON orderlines(customer_nr);
        CREATE INDEX IF NOT EXISTS idx_orderlines_product ON orderlines(product_nr);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
