//! Recommendation endpoints.
//!
//! The user endpoints translate `RecommenderNotReady` into a 200 with an
//! empty list and a status note; everything else propagates through
//! [`ApiError`]. All reads run through the recommendations cache
//! namespace, which order ingestion and pair recomputes invalidate.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use torg_cache::CacheNamespace;
use torg_core::models::{PairIndexStatus, RecommendedProduct};
use torg_core::TorgError;
use torg_recommend::SimilarAlgorithm;
use tracing::debug;

use crate::dto::{
    ProductRecommendationsResponse, RecommendMetadata, RecommendQuery, SimilarRequest,
    UserRecommendationsResponse,
};
use crate::error::ApiError;
use crate::runtime::TorgRuntime;

/// `GET /naive-recommender/user/{userId}/collaborative`
pub async fn user_collaborative(
    State(runtime): State<Arc<TorgRuntime>>,
    Path(user_id): Path<String>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<UserRecommendationsResponse>, ApiError> {
    user_recommendations(runtime, user_id, query.limit, "collaborative").await
}

/// `GET /naive-recommender/user/{userId}/hybrid`
pub async fn user_hybrid(
    State(runtime): State<Arc<TorgRuntime>>,
    Path(user_id): Path<String>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<UserRecommendationsResponse>, ApiError> {
    user_recommendations(runtime, user_id, query.limit, "hybrid").await
}

async fn user_recommendations(
    runtime: Arc<TorgRuntime>,
    user_id: String,
    limit: Option<usize>,
    algorithm: &'static str,
) -> Result<Json<UserRecommendationsResponse>, ApiError> {
    let started = Instant::now();
    let operation = match algorithm {
        "collaborative" => "user-collaborative",
        _ => "user-hybrid",
    };
    let params = serde_json::json!({ "userId": &user_id, "limit": limit });

    let recommend = &runtime.recommend;
    let user = &user_id;
    let result = runtime
        .cache
        .get_or_compute(CacheNamespace::Recommendations, operation, &params, || {
            async move {
                let recommendations = match algorithm {
                    "collaborative" => recommend.collaborative_for_user(user, limit).await?,
                    _ => recommend.hybrid_for_user(user, limit).await?,
                };
                serde_json::to_value(recommendations).map_err(TorgError::from)
            }
        })
        .await;

    let (recommendations, status): (Vec<RecommendedProduct>, Option<String>) = match result {
        Ok(value) => (serde_json::from_value(value.as_ref().clone())?, None),
        Err(TorgError::RecommenderNotReady) => {
            debug!(user_id = %user_id, "pair index never built, answering empty");
            (Vec::new(), Some(TorgError::RecommenderNotReady.to_string()))
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Json(UserRecommendationsResponse {
        metadata: RecommendMetadata {
            algorithm: algorithm.to_string(),
            count: recommendations.len(),
            processing_time_ms: started.elapsed().as_millis() as u64,
        },
        user_id,
        recommendations,
        status,
    }))
}

/// `GET /naive-recommender/product/{productId}/content-based`
pub async fn content_based(
    State(runtime): State<Arc<TorgRuntime>>,
    Path(product_id): Path<String>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<ProductRecommendationsResponse>, ApiError> {
    product_recommendations(runtime, product_id, query.limit, "content_based").await
}

/// `GET /naive-recommender/product/{productId}/frequently-bought-together`
pub async fn frequently_bought_together(
    State(runtime): State<Arc<TorgRuntime>>,
    Path(product_id): Path<String>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<ProductRecommendationsResponse>, ApiError> {
    product_recommendations(runtime, product_id, query.limit, "frequently_bought_together").await
}

async fn product_recommendations(
    runtime: Arc<TorgRuntime>,
    product_id: String,
    limit: Option<usize>,
    algorithm: &'static str,
) -> Result<Json<ProductRecommendationsResponse>, ApiError> {
    let started = Instant::now();
    let operation = match algorithm {
        "content_based" => "content-based",
        _ => "frequently-bought-together",
    };
    let params = serde_json::json!({ "productId": &product_id, "limit": limit });

    let recommend = &runtime.recommend;
    let id = &product_id;
    let value = runtime
        .cache
        .get_or_compute(CacheNamespace::Recommendations, operation, &params, || {
            async move {
                let recommendations = match algorithm {
                    "content_based" => recommend.content_based(id, limit).await?,
                    _ => recommend.frequently_bought_together(id, limit).await?,
                };
                serde_json::to_value(recommendations).map_err(TorgError::from)
            }
        })
        .await?;
    let recommendations: Vec<RecommendedProduct> = serde_json::from_value(value.as_ref().clone())?;

    Ok(Json(ProductRecommendationsResponse {
        metadata: RecommendMetadata {
            algorithm: algorithm.to_string(),
            count: recommendations.len(),
            processing_time_ms: started.elapsed().as_millis() as u64,
        },
        product_id,
        recommendations,
    }))
}

/// `POST /similar/{productId}`
pub async fn similar(
    State(runtime): State<Arc<TorgRuntime>>,
    Path(product_id): Path<String>,
    Json(body): Json<SimilarRequest>,
) -> Result<Json<Vec<RecommendedProduct>>, ApiError> {
    let algorithm: SimilarAlgorithm = body.algorithm.parse()?;
    let params = serde_json::json!({
        "productId": &product_id,
        "algorithm": algorithm.as_str(),
        "limit": body.limit,
        "season": &body.season,
    });

    let recommend = &runtime.recommend;
    let id = &product_id;
    let limit = body.limit;
    let season = body.season;
    let value = runtime
        .cache
        .get_or_compute(CacheNamespace::Recommendations, "similar", &params, || {
            async move {
                let recommendations = recommend.similar(id, algorithm, limit, season).await?;
                serde_json::to_value(recommendations).map_err(TorgError::from)
            }
        })
        .await?;
    let recommendations: Vec<RecommendedProduct> = serde_json::from_value(value.as_ref().clone())?;
    Ok(Json(recommendations))
}

/// `POST /naive-recommender/compute-product-pairs`
///
/// Always answers 202. A trigger that lands while a rebuild is running
/// reports the running job instead of spawning a second one.
pub async fn compute_product_pairs(
    State(runtime): State<Arc<TorgRuntime>>,
) -> Result<(StatusCode, Json<PairIndexStatus>), ApiError> {
    let status = runtime.recommend.trigger_pair_rebuild().await?;
    runtime.cache.invalidate(CacheNamespace::Recommendations);
    Ok((StatusCode::ACCEPTED, Json(status)))
}

/// `GET /naive-recommender/product-pairs-status`
pub async fn product_pairs_status(
    State(runtime): State<Arc<TorgRuntime>>,
) -> Result<Json<PairIndexStatus>, ApiError> {
    Ok(Json(runtime.recommend.pair_status().await?))
}
