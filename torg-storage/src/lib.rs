//! # torg-storage
//!
//! SQLite persistence layer. One writer connection behind a mutex, a
//! round-robin read pool, idempotent migrations, and the query primitives
//! the search and recommendation engines build on: substring text match,
//! brute-force cosine vector search, and canonical co-occurrence pairs.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use torg_core::errors::{StorageError, TorgError};

/// Map a low-level SQLite message into the storage error taxonomy.
pub(crate) fn to_storage_err(message: String) -> TorgError {
    TorgError::Storage(StorageError::SqliteError { message })
}
