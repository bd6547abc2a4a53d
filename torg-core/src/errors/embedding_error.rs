/// Embedding provider errors. These degrade vector search; they are never
/// surfaced as a request failure.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("embedding timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("provider returned {actual} dimensions, expected {expected}")]
    WrongDimension { expected: usize, actual: usize },

    #[error("provider returned no embedding for the input")]
    EmptyResponse,
}
