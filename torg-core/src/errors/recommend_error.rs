/// Recommendation subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error("unknown recommendation algorithm: {name}")]
    UnknownAlgorithm { name: String },

    #[error("pair computation failed: {reason}")]
    ComputeFailed { reason: String },
}
