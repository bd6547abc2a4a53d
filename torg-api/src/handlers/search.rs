//! Search endpoints: consolidated search, products-only search,
//! autosuggest, query-explain and feedback.
//!
//! The two search endpoints run through the cache layer; the response
//! payload is cached, while metadata (processing time) is stamped per
//! request. Every search lands in the metrics log.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::Json;
use torg_cache::CacheNamespace;
use torg_core::TorgError;
use torg_observability::{FeedbackEvent, SearchRecord};
use torg_search::{ProductSearchOutcome, SearchOutcome, Suggestion};

use crate::dto::{
    AutosuggestRequest, ConsolidatedSearchRequest, ConsolidatedSearchResponse, FeedbackRequest,
    FeedbackResponse, ProductSearchRequest, ProductSearchResponse, QueryExplainRequest,
    QueryExplainResponse, SearchMetadata,
};
use crate::error::ApiError;
use crate::runtime::TorgRuntime;

/// `POST /consolidated-search`
pub async fn consolidated_search(
    State(runtime): State<Arc<TorgRuntime>>,
    Json(body): Json<ConsolidatedSearchRequest>,
) -> Result<Json<ConsolidatedSearchResponse>, ApiError> {
    let started = Instant::now();
    let params = serde_json::to_value(&body)?;

    let computed = AtomicBool::new(false);
    let search = &runtime.search;
    let value = runtime
        .cache
        .get_or_compute(CacheNamespace::Search, "consolidated-search", &params, || {
            computed.store(true, Ordering::Relaxed);
            let request = body.to_engine();
            async move {
                let outcome = search.consolidated_search(&request).await?;
                serde_json::to_value(outcome).map_err(TorgError::from)
            }
        })
        .await?;
    let outcome: SearchOutcome = serde_json::from_value(value.as_ref().clone())?;

    let duration_ms = started.elapsed().as_millis() as u64;
    runtime.record_search(SearchRecord::new(
        body.query.clone(),
        outcome.total_results,
        duration_ms,
        !computed.load(Ordering::Relaxed),
    ));

    Ok(Json(ConsolidatedSearchResponse {
        metadata: SearchMetadata {
            total_results: outcome.total_results,
            processing_time_ms: duration_ms,
            query: body.query,
        },
        categories: outcome.categories,
        brands: outcome.brands,
        products: outcome.products,
    }))
}

/// `POST /search`
pub async fn product_search(
    State(runtime): State<Arc<TorgRuntime>>,
    Json(body): Json<ProductSearchRequest>,
) -> Result<Json<ProductSearchResponse>, ApiError> {
    let started = Instant::now();
    let params = serde_json::to_value(&body)?;

    let computed = AtomicBool::new(false);
    let search = &runtime.search;
    let value = runtime
        .cache
        .get_or_compute(CacheNamespace::Search, "search", &params, || {
            computed.store(true, Ordering::Relaxed);
            let request = body.to_engine();
            async move {
                let outcome = search.product_search(&request).await?;
                serde_json::to_value(outcome).map_err(TorgError::from)
            }
        })
        .await?;
    let outcome: ProductSearchOutcome = serde_json::from_value(value.as_ref().clone())?;

    let duration_ms = started.elapsed().as_millis() as u64;
    runtime.record_search(SearchRecord::new(
        body.query.clone(),
        outcome.total_results,
        duration_ms,
        !computed.load(Ordering::Relaxed),
    ));

    Ok(Json(ProductSearchResponse {
        metadata: SearchMetadata {
            total_results: outcome.total_results,
            processing_time_ms: duration_ms,
            query: body.query,
        },
        products: outcome.products,
        facets: outcome.facets,
    }))
}

/// `POST /autosuggest`
pub async fn autosuggest(
    State(runtime): State<Arc<TorgRuntime>>,
    Json(body): Json<AutosuggestRequest>,
) -> Result<Json<Vec<Suggestion>>, ApiError> {
    let suggestions = runtime.search.autosuggest(&body.prefix, body.limit).await?;
    Ok(Json(suggestions))
}

/// `POST /query-explain`
pub async fn query_explain(
    State(runtime): State<Arc<TorgRuntime>>,
    Json(body): Json<QueryExplainRequest>,
) -> Result<Json<QueryExplainResponse>, ApiError> {
    let plan = runtime
        .search
        .explain(&body.query, body.include_vector_search)
        .await?;

    // The fingerprint an equivalent consolidated search would cache under.
    let search_body = ConsolidatedSearchRequest {
        query: body.query,
        include_vector_search: body.include_vector_search,
        ..ConsolidatedSearchRequest::default()
    };
    let params = serde_json::to_value(&search_body)?;
    let cache_key = runtime.cache.key_for("consolidated-search", &params)?;

    Ok(Json(QueryExplainResponse {
        plan,
        cache_key,
        cache: runtime.cache.stats(),
    }))
}

/// `POST /feedback`
pub async fn feedback(
    State(runtime): State<Arc<TorgRuntime>>,
    Json(body): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    runtime.record_feedback(FeedbackEvent {
        query: body.query,
        product_id: body.product_id,
        action: body.action,
        timestamp: chrono::Utc::now(),
    })?;
    Ok(Json(FeedbackResponse {
        status: "recorded".to_string(),
    }))
}
