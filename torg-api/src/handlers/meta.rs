//! Monitoring endpoints: aggregated statistics and health.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use torg_observability::HealthReport;

use crate::dto::ApiStatsResponse;
use crate::error::ApiError;
use crate::runtime::TorgRuntime;

/// `GET /api-stats`
pub async fn api_stats(
    State(runtime): State<Arc<TorgRuntime>>,
) -> Result<Json<ApiStatsResponse>, ApiError> {
    let metrics = runtime.metrics_snapshot()?;
    let pair_index = runtime.recommend.pair_status().await?;
    Ok(Json(ApiStatsResponse {
        metrics,
        cache: runtime.cache.stats(),
        pair_index,
    }))
}

/// `GET /health` never fails; a storage fault degrades the report
/// instead of erroring the endpoint.
pub async fn health(State(runtime): State<Arc<TorgRuntime>>) -> Json<HealthReport> {
    let counts = runtime.storage_counts().await;
    Json(runtime.health.report(counts))
}
