//! Default values for every tunable. Config structs reference these so the
//! TOML surface and the compiled defaults cannot drift apart.

// --- search ---
pub const DEFAULT_MAX_CATEGORIES: usize = 5;
pub const DEFAULT_MAX_BRANDS: usize = 5;
pub const DEFAULT_MAX_PRODUCTS: usize = 20;
pub const DEFAULT_STRATEGY_CAP: usize = 100;
pub const DEFAULT_NGRAM_MIN: usize = 3;
pub const DEFAULT_NGRAM_MAX: usize = 4;
pub const DEFAULT_VECTOR_SIMILARITY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_VECTOR_K: usize = 50;
pub const DEFAULT_STRATEGY_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SUGGEST_LIMIT: usize = 10;
pub const MAX_SUGGEST_LIMIT: usize = 25;

// --- recommend ---
pub const DEFAULT_TITLE_WEIGHT: f64 = 3.0;
pub const DEFAULT_DESCRIPTION_WEIGHT: f64 = 2.0;
pub const DEFAULT_CATEGORY_BOOST: f64 = 5.0;
pub const DEFAULT_BRAND_BOOST: f64 = 5.0;
pub const DEFAULT_COLLABORATIVE_WEIGHT: f64 = 0.6;
pub const DEFAULT_CONTENT_WEIGHT: f64 = 0.4;
pub const DEFAULT_RECOMMEND_LIMIT: usize = 10;
pub const MAX_RECOMMEND_LIMIT: usize = 50;
pub const DEFAULT_IN_STOCK_BOOST: f64 = 0.3;
pub const DEFAULT_ON_SALE_BOOST: f64 = 0.2;

// --- cache ---
pub const DEFAULT_SEARCH_CACHE_CAPACITY: u64 = 500;
pub const DEFAULT_SEARCH_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_PRODUCT_CACHE_CAPACITY: u64 = 1_000;
pub const DEFAULT_PRODUCT_CACHE_TTL_SECS: u64 = 3_600;
pub const DEFAULT_RECOMMENDATIONS_CACHE_CAPACITY: u64 = 200;
pub const DEFAULT_RECOMMENDATIONS_CACHE_TTL_SECS: u64 = 1_800;

// --- embedding ---
pub const DEFAULT_EMBEDDING_DIMENSION: usize = crate::constants::EMBEDDING_DIMENSION;
pub const DEFAULT_EMBED_TIMEOUT_MS: u64 = 1_500;
pub const DEFAULT_EMBED_CACHE_CAPACITY: u64 = 2_048;
pub const DEFAULT_EMBED_CACHE_TTI_SECS: u64 = 3_600;

// --- storage ---
pub const DEFAULT_READ_POOL_SIZE: usize = 4;
