//! Wire DTOs for the HTTP surface.
//!
//! Request bodies also serve as cache parameters: they serialize to
//! canonical camelCase JSON, so two requests that mean the same thing
//! fingerprint to the same cache key.

use serde::{Deserialize, Serialize};
use torg_cache::CacheStats;
use torg_core::config::defaults;
use torg_core::models::{
    BrandResult, CategoryResult, Facets, PairIndexStatus, ProductHit, RecommendedProduct,
};
use torg_observability::MetricsSnapshot;
use torg_search::{QueryExplainOutcome, SearchRequest};

/// Body of `POST /consolidated-search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsolidatedSearchRequest {
    pub query: String,
    pub max_categories: usize,
    pub max_brands: usize,
    pub max_products: usize,
    pub include_vector_search: bool,
}

impl Default for ConsolidatedSearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_categories: defaults::DEFAULT_MAX_CATEGORIES,
            max_brands: defaults::DEFAULT_MAX_BRANDS,
            max_products: defaults::DEFAULT_MAX_PRODUCTS,
            include_vector_search: true,
        }
    }
}

impl ConsolidatedSearchRequest {
    pub fn to_engine(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.clone(),
            max_categories: self.max_categories,
            max_brands: self.max_brands,
            max_products: self.max_products,
            include_vector_search: self.include_vector_search,
        }
    }
}

/// Body of `POST /search` (products-only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSearchRequest {
    pub query: String,
    pub max_products: usize,
    pub include_vector_search: bool,
}

impl Default for ProductSearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            max_products: defaults::DEFAULT_MAX_PRODUCTS,
            include_vector_search: true,
        }
    }
}

impl ProductSearchRequest {
    pub fn to_engine(&self) -> SearchRequest {
        SearchRequest {
            query: self.query.clone(),
            max_products: self.max_products,
            include_vector_search: self.include_vector_search,
            ..SearchRequest::new("")
        }
    }
}

/// Body of `POST /autosuggest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosuggestRequest {
    pub prefix: String,
    pub limit: Option<usize>,
}

impl Default for AutosuggestRequest {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            limit: None,
        }
    }
}

/// Body of `POST /query-explain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryExplainRequest {
    pub query: String,
    pub include_vector_search: bool,
}

impl Default for QueryExplainRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            include_vector_search: true,
        }
    }
}

/// Body of `POST /feedback`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub query: String,
    #[serde(default)]
    pub product_id: Option<String>,
    pub action: String,
}

/// Body of `POST /similar/{productId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarRequest {
    pub algorithm: String,
    pub limit: Option<usize>,
    pub season: Option<String>,
}

impl Default for SimilarRequest {
    fn default() -> Self {
        Self {
            algorithm: "hybrid".to_string(),
            limit: None,
            season: None,
        }
    }
}

/// `?limit=` query parameter on the recommender GET endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendQuery {
    pub limit: Option<usize>,
}

/// Request accounting attached to every search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    pub total_results: usize,
    pub processing_time_ms: u64,
    pub query: String,
}

/// Response of `POST /consolidated-search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidatedSearchResponse {
    pub categories: Vec<CategoryResult>,
    pub brands: Vec<BrandResult>,
    pub products: Vec<ProductHit>,
    pub metadata: SearchMetadata,
}

/// Response of `POST /search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSearchResponse {
    pub products: Vec<ProductHit>,
    pub facets: Facets,
    pub metadata: SearchMetadata,
}

/// Response of `POST /query-explain`: the plan debug plus cache insight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExplainResponse {
    #[serde(flatten)]
    pub plan: QueryExplainOutcome,
    pub cache_key: String,
    pub cache: CacheStats,
}

/// Response of `POST /feedback`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub status: String,
}

/// Per-request accounting for the recommender endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendMetadata {
    pub algorithm: String,
    pub count: usize,
    pub processing_time_ms: u64,
}

/// Response of the user recommendation endpoints. `status` carries the
/// not-ready note when the pair index was never built; the request still
/// succeeds with an empty list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecommendationsResponse {
    pub user_id: String,
    pub recommendations: Vec<RecommendedProduct>,
    pub metadata: RecommendMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Response of the product recommendation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecommendationsResponse {
    pub product_id: String,
    pub recommendations: Vec<RecommendedProduct>,
    pub metadata: RecommendMetadata,
}

/// Response of `POST /ingest/products`. A product lands in `failed` when
/// its embeddings could not be generated (it is still stored, without
/// vectors) or when the upsert itself failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestProductsResponse {
    pub ingested: Vec<String>,
    pub failed: Vec<String>,
}

/// Response of `POST /ingest/orderline`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderlineIngestResponse {
    pub status: String,
    pub order_nr: String,
    pub product_nr: String,
}

/// Response of `GET /api-stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatsResponse {
    pub metrics: MetricsSnapshot,
    pub cache: CacheStats,
    pub pair_index: PairIndexStatus,
}
