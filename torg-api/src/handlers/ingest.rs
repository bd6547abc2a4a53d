//! Catalog and order ingestion.
//!
//! Product ingestion embeds title and description before the upsert; an
//! embedding fault stores the product without vectors and reports it in
//! `failed`. Orderline ingestion finishes the incremental pair update
//! before answering, so recommendations never lag behind orders.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use torg_cache::CacheNamespace;
use torg_core::models::{Orderline, Product};
use torg_core::traits::{IEmbedder, IProductRepository};
use torg_core::{TorgError, TorgResult};
use tracing::{info, warn};

use crate::dto::{IngestProductsResponse, OrderlineIngestResponse};
use crate::error::ApiError;
use crate::runtime::TorgRuntime;

/// `POST /ingest/products`
pub async fn ingest_products(
    State(runtime): State<Arc<TorgRuntime>>,
    Json(products): Json<Vec<Product>>,
) -> Result<(StatusCode, Json<IngestProductsResponse>), ApiError> {
    let storage = Arc::clone(&runtime.storage);
    let embedder = Arc::clone(&runtime.embedder);

    let (ingested, failed) = tokio::task::spawn_blocking(move || {
        let mut ingested = Vec::new();
        let mut failed = Vec::new();
        for mut product in products {
            let embedded = match embed_product(embedder.as_ref(), &mut product) {
                Ok(()) => true,
                Err(e) => {
                    warn!(
                        product_id = %product.id,
                        error = %e,
                        "embedding failed, storing without vectors"
                    );
                    product.title_embedding = None;
                    product.description_embedding = None;
                    false
                }
            };
            match storage.upsert_product(&product) {
                Ok(()) if embedded => ingested.push(product.id),
                Ok(()) => failed.push(product.id),
                Err(e) => {
                    warn!(product_id = %product.id, error = %e, "product upsert failed");
                    failed.push(product.id);
                }
            }
        }
        (ingested, failed)
    })
    .await
    .map_err(|e| TorgError::internal(format!("ingestion task panicked: {e}")))?;

    runtime.cache.invalidate(CacheNamespace::Product);
    runtime.cache.invalidate(CacheNamespace::Search);

    info!(
        ingested = ingested.len(),
        failed = failed.len(),
        "product ingestion complete"
    );
    Ok((
        StatusCode::CREATED,
        Json(IngestProductsResponse { ingested, failed }),
    ))
}

fn embed_product(embedder: &dyn IEmbedder, product: &mut Product) -> TorgResult<()> {
    product.title_embedding = Some(embedder.embed(&product.title)?);
    product.description_embedding = Some(embedder.embed(&product.description)?);
    Ok(())
}

/// `GET /products/{productId}`: the full stored document, vectors
/// included.
pub async fn get_product(
    State(runtime): State<Arc<TorgRuntime>>,
    Path(product_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let params = serde_json::json!({ "productId": &product_id });

    let storage = &runtime.storage;
    let id = &product_id;
    let value = runtime
        .cache
        .get_or_compute(CacheNamespace::Product, "get-product", &params, || {
            async move {
                let storage = Arc::clone(storage);
                let lookup_id = id.clone();
                let product = tokio::task::spawn_blocking(move || storage.get_product(&lookup_id))
                    .await
                    .map_err(|e| TorgError::internal(format!("product lookup task panicked: {e}")))??
                    .ok_or_else(|| TorgError::not_found("product", id.clone()))?;
                serde_json::to_value(product).map_err(TorgError::from)
            }
        })
        .await?;

    let product: Product = serde_json::from_value(value.as_ref().clone())?;
    Ok(Json(product))
}

/// `DELETE /products/{productId}`
pub async fn delete_product(
    State(runtime): State<Arc<TorgRuntime>>,
    Path(product_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let storage = Arc::clone(&runtime.storage);
    let id = product_id.clone();
    let deleted = tokio::task::spawn_blocking(move || storage.delete_product(&id))
        .await
        .map_err(|e| TorgError::internal(format!("product delete task panicked: {e}")))??;

    if !deleted {
        return Err(TorgError::not_found("product", product_id).into());
    }

    runtime.cache.invalidate(CacheNamespace::Product);
    runtime.cache.invalidate(CacheNamespace::Search);
    info!(product_id = %product_id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /ingest/orderline`
pub async fn ingest_orderline(
    State(runtime): State<Arc<TorgRuntime>>,
    Json(line): Json<Orderline>,
) -> Result<(StatusCode, Json<OrderlineIngestResponse>), ApiError> {
    let order_nr = line.order_nr.clone();
    let product_nr = line.product_nr.clone();

    let created = runtime.recommend.ingest_orderline(line).await?;
    runtime.cache.invalidate(CacheNamespace::Recommendations);

    let status = if created { "recorded" } else { "duplicate" };
    Ok((
        StatusCode::CREATED,
        Json(OrderlineIngestResponse {
            status: status.to_string(),
            order_nr,
            product_nr,
        }),
    ))
}
