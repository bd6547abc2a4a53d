//! Route table. Paths mirror the documented API surface.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{ingest, meta, recommend, search};
use crate::runtime::TorgRuntime;

pub fn router(runtime: Arc<TorgRuntime>) -> Router {
    Router::new()
        .route("/consolidated-search", post(search::consolidated_search))
        .route("/search", post(search::product_search))
        .route("/autosuggest", post(search::autosuggest))
        .route("/query-explain", post(search::query_explain))
        .route("/feedback", post(search::feedback))
        .route("/similar/:product_id", post(recommend::similar))
        .route(
            "/naive-recommender/user/:user_id/collaborative",
            get(recommend::user_collaborative),
        )
        .route(
            "/naive-recommender/user/:user_id/hybrid",
            get(recommend::user_hybrid),
        )
        .route(
            "/naive-recommender/product/:product_id/content-based",
            get(recommend::content_based),
        )
        .route(
            "/naive-recommender/product/:product_id/frequently-bought-together",
            get(recommend::frequently_bought_together),
        )
        .route(
            "/naive-recommender/compute-product-pairs",
            post(recommend::compute_product_pairs),
        )
        .route(
            "/naive-recommender/product-pairs-status",
            get(recommend::product_pairs_status),
        )
        .route("/ingest/products", post(ingest::ingest_products))
        .route("/ingest/orderline", post(ingest::ingest_orderline))
        .route(
            "/products/:product_id",
            get(ingest::get_product).delete(ingest::delete_product),
        )
        .route("/api-stats", get(meta::api_stats))
        .route("/health", get(meta::health))
        .layer(TraceLayer::new_for_http())
        .with_state(runtime)
}
