use crate::errors::TorgResult;
use crate::models::{EmbeddingField, Orderline, Product, ProductPair};

/// Text fields a pattern query can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Title,
    Description,
    Brand,
    ProductType,
}

impl TextField {
    /// Column name in the products table.
    pub fn column(self) -> &'static str {
        match self {
            TextField::Title => "title",
            TextField::Description => "description",
            TextField::Brand => "brand",
            TextField::ProductType => "product_type",
        }
    }
}

/// Catalog persistence plus the two search primitives the match strategies
/// build on.
pub trait IProductRepository: Send + Sync {
    // --- CRUD ---
    fn upsert_product(&self, product: &Product) -> TorgResult<()>;
    fn get_product(&self, id: &str) -> TorgResult<Option<Product>>;
    /// Returns false when the id was unknown.
    fn delete_product(&self, id: &str) -> TorgResult<bool>;
    fn delete_all_products(&self) -> TorgResult<u64>;
    fn all_products(&self) -> TorgResult<Vec<Product>>;
    fn product_count(&self) -> TorgResult<u64>;

    // --- Search primitives ---
    /// Case-insensitive substring scan over the given fields. The pattern is
    /// a plain string; word-boundary semantics are applied by the caller.
    fn find_by_text_match(&self, fields: &[TextField], pattern: &str) -> TorgResult<Vec<Product>>;

    /// Brute-force cosine scan against the stored embeddings of `field`.
    /// Returns up to `k` products with similarity > 0, descending.
    fn find_by_vector_similarity(
        &self,
        vector: &[f32],
        field: EmbeddingField,
        k: usize,
    ) -> TorgResult<Vec<(Product, f64)>>;
}

/// Order history persistence.
pub trait IOrderRepository: Send + Sync {
    /// Insert a line. Returns false when `(order_nr, product_nr)` already
    /// exists; replayed lines are a no-op.
    fn insert_orderline(&self, line: &Orderline) -> TorgResult<bool>;

    /// Distinct product ids in one order.
    fn products_in_order(&self, order_nr: &str) -> TorgResult<Vec<String>>;

    /// Distinct product ids ever purchased by a customer.
    fn purchased_products(&self, customer_nr: &str) -> TorgResult<Vec<String>>;

    /// The customer's most recent purchase, if any.
    fn latest_purchase(&self, customer_nr: &str) -> TorgResult<Option<String>>;

    /// Every order with its distinct product ids, for full recompute.
    fn all_order_groups(&self) -> TorgResult<Vec<(String, Vec<String>)>>;

    fn orderline_count(&self) -> TorgResult<u64>;

    /// Most frequent season name across all orderlines, if any. Fallback
    /// season for boosting when a request names none.
    fn dominant_season(&self) -> TorgResult<Option<String>>;
}

/// Co-occurrence pair persistence. Implementations must store pairs
/// canonically (`product_a < product_b`) and reject self-pairs.
pub trait IPairRepository: Send + Sync {
    /// Upsert the canonical pair for `(a, b)`, adding `delta` to its count.
    fn upsert_pair(&self, a: &str, b: &str, delta: i64) -> TorgResult<()>;

    /// Accumulated co-occurrence counts around the given products, keyed by
    /// the other pair member. Members of `product_ids` are not excluded
    /// here; callers filter already-purchased candidates.
    fn aggregate_pairs_for_products(
        &self,
        product_ids: &[String],
    ) -> TorgResult<Vec<(String, i64)>>;

    /// Pairs containing the given product, regardless of side.
    fn pairs_for_product(&self, product_id: &str) -> TorgResult<Vec<ProductPair>>;

    fn pair_count(&self) -> TorgResult<u64>;

    /// Drop every pair; full recompute starts from an empty table.
    fn clear_pairs(&self) -> TorgResult<()>;
}
