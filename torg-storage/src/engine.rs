//! StorageEngine owns the ConnectionPool, implements the repository
//! traits, and runs migrations at open.

use std::path::Path;

use torg_core::errors::{StorageError, TorgResult};
use torg_core::models::{EmbeddingField, Orderline, Product, ProductPair};
use torg_core::traits::{IOrderRepository, IPairRepository, IProductRepository, TextField};

use crate::migrations;
use crate::pool::ConnectionPool;

/// The main storage engine. Owns the connection pool and provides the
/// product, order, and pair repository interfaces.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, use the read pool for read operations (file-backed mode).
    /// When false, route all reads through the writer (in-memory mode,
    /// because in-memory read pool connections are isolated databases).
    use_read_pool: bool,
    /// Dimension every stored embedding must have.
    embedding_dimension: usize,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path, read_pool_size: usize, embedding_dimension: usize) -> TorgResult<Self> {
        let pool = ConnectionPool::open(path, read_pool_size)?;
        let engine = Self {
            pool,
            use_read_pool: true,
            embedding_dimension,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory(embedding_dimension: usize) -> TorgResult<Self> {
        let pool = ConnectionPool::open_in_memory(1)?;
        let engine = Self {
            pool,
            use_read_pool: false,
            embedding_dimension,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Run migrations on the writer.
    fn initialize(&self) -> TorgResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| migrations::run_migrations(conn))
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> TorgResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> TorgResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn_sync(f)
        }
    }

    fn validate_dimensions(&self, product: &Product) -> TorgResult<()> {
        for embedding in [
            product.title_embedding.as_ref(),
            product.description_embedding.as_ref(),
        ]
        .into_iter()
        .flatten()
        {
            if embedding.len() != self.embedding_dimension {
                return Err(StorageError::DimensionMismatch {
                    expected: self.embedding_dimension,
                    actual: embedding.len(),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl IProductRepository for StorageEngine {
    fn upsert_product(&self, product: &Product) -> TorgResult<()> {
        self.validate_dimensions(product)?;
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::product_crud::upsert_product(conn, product))
    }

    fn get_product(&self, id: &str) -> TorgResult<Option<Product>> {
        self.with_reader(|conn| crate::queries::product_crud::get_product(conn, id))
    }

    fn delete_product(&self, id: &str) -> TorgResult<bool> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::product_crud::delete_product(conn, id))
    }

    fn delete_all_products(&self) -> TorgResult<u64> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::product_crud::delete_all_products(conn))
    }

    fn all_products(&self) -> TorgResult<Vec<Product>> {
        self.with_reader(|conn| crate::queries::product_crud::all_products(conn))
    }

    fn product_count(&self) -> TorgResult<u64> {
        self.with_reader(|conn| crate::queries::product_crud::product_count(conn))
    }

    fn find_by_text_match(&self, fields: &[TextField], pattern: &str) -> TorgResult<Vec<Product>> {
        self.with_reader(|conn| crate::queries::text_search::find_by_text_match(conn, fields, pattern))
    }

    fn find_by_vector_similarity(
        &self,
        vector: &[f32],
        field: EmbeddingField,
        k: usize,
    ) -> TorgResult<Vec<(Product, f64)>> {
        self.with_reader(|conn| {
            crate::queries::vector_search::find_by_vector_similarity(conn, vector, field, k)
        })
    }
}

impl IOrderRepository for StorageEngine {
    fn insert_orderline(&self, line: &Orderline) -> TorgResult<bool> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::orders::insert_orderline(conn, line))
    }

    fn products_in_order(&self, order_nr: &str) -> TorgResult<Vec<String>> {
        self.with_reader(|conn| crate::queries::orders::products_in_order(conn, order_nr))
    }

    fn purchased_products(&self, customer_nr: &str) -> TorgResult<Vec<String>> {
        self.with_reader(|conn| crate::queries::orders::purchased_products(conn, customer_nr))
    }

    fn latest_purchase(&self, customer_nr: &str) -> TorgResult<Option<String>> {
        self.with_reader(|conn| crate::queries::orders::latest_purchase(conn, customer_nr))
    }

    fn all_order_groups(&self) -> TorgResult<Vec<(String, Vec<String>)>> {
        self.with_reader(|conn| crate::queries::orders::all_order_groups(conn))
    }

    fn orderline_count(&self) -> TorgResult<u64> {
        self.with_reader(|conn| crate::queries::orders::orderline_count(conn))
    }

    fn dominant_season(&self) -> TorgResult<Option<String>> {
        self.with_reader(|conn| crate::queries::orders::dominant_season(conn))
    }
}

impl IPairRepository for StorageEngine {
    fn upsert_pair(&self, a: &str, b: &str, delta: i64) -> TorgResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::pairs::upsert_pair(conn, a, b, delta))
    }

    fn aggregate_pairs_for_products(
        &self,
        product_ids: &[String],
    ) -> TorgResult<Vec<(String, i64)>> {
        self.with_reader(|conn| {
            crate::queries::pairs::aggregate_pairs_for_products(conn, product_ids)
        })
    }

    fn pairs_for_product(&self, product_id: &str) -> TorgResult<Vec<ProductPair>> {
        self.with_reader(|conn| crate::queries::pairs::pairs_for_product(conn, product_id))
    }

    fn pair_count(&self) -> TorgResult<u64> {
        self.with_reader(|conn| crate::queries::pairs::pair_count(conn))
    }

    fn clear_pairs(&self) -> TorgResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| crate::queries::pairs::clear_pairs(conn))
    }
}
