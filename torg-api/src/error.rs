//! HTTP mapping for [`TorgError`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use torg_core::errors::RecommendError;
use torg_core::TorgError;
use tracing::error;

/// Error body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Wrapper that renders a [`TorgError`] as an HTTP response.
///
/// `Validation` and an unknown recommendation algorithm map to 400,
/// `NotFound` to 404. Everything else answers 500 with an opaque body;
/// the full error is logged server-side. `RecommenderNotReady` never
/// reaches this type: the recommender handlers convert it into an empty
/// result with a status note.
#[derive(Debug)]
pub struct ApiError(pub TorgError);

impl<E> From<E> for ApiError
where
    E: Into<TorgError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            TorgError::Validation { .. } => (StatusCode::BAD_REQUEST, self.0.to_string()),
            TorgError::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            TorgError::Recommend(RecommendError::UnknownAlgorithm { .. }) => {
                (StatusCode::BAD_REQUEST, self.0.to_string())
            }
            other => {
                error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
