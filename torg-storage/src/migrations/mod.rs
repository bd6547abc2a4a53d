//! Versioned schema migrations tracked via `PRAGMA user_version`.

mod v001_catalog;
mod v002_orders;
mod v003_pairs;

use rusqlite::Connection;

use torg_core::errors::{StorageError, TorgResult};

use crate::to_storage_err;

type Migration = fn(&Connection) -> TorgResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[
    (1, v001_catalog::migrate),
    (2, v002_orders::migrate),
    (3, v003_pairs::migrate),
];

/// Run every migration newer than the database's current version.
/// Safe to call on every open; applied versions are skipped.
pub fn run_migrations(conn: &Connection) -> TorgResult<()> {
    let current: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;

    for (version, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        migrate(conn).map_err(|e| StorageError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| to_storage_err(e.to_string()))?;
        tracing::debug!(version, "applied migration");
    }
    Ok(())
}

/// The schema version the binary expects.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map(|(v, _)| *v).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn all_tables_exist_after_migration() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        for table in ["products", "orderlines", "product_pairs"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }
}
