//! Error taxonomy for the torg service.
//!
//! Subsystem enums convert into [`TorgError`] via `From`, so crate-internal
//! code can return its own error type and still compose with `?` at the
//! engine boundaries.

mod embedding_error;
mod recommend_error;
mod search_error;
mod storage_error;

pub use embedding_error::EmbeddingError;
pub use recommend_error::RecommendError;
pub use search_error::SearchError;
pub use storage_error::StorageError;

/// Workspace-wide result alias.
pub type TorgResult<T> = Result<T, TorgError>;

/// Top-level error for the torg service.
///
/// HTTP mapping: `Validation` → 400, `NotFound` → 404, everything else
/// → 500 with an opaque message. `UpstreamTimeout` never reaches a response
/// body: the affected strategy is skipped and the request degrades.
/// `RecommenderNotReady` answers with an empty list plus a status note.
#[derive(Debug, thiserror::Error)]
pub enum TorgError {
    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{component} timed out after {timeout_ms}ms")]
    UpstreamTimeout { component: String, timeout_ms: u64 },

    #[error("recommender not ready: product pairs have not been computed")]
    RecommenderNotReady,

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Recommend(#[from] RecommendError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TorgError {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a missing entity, e.g. `not_found("product", id)`.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Shorthand for an unexpected fault.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
