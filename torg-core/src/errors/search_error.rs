/// Search pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("strategy {strategy} failed: {reason}")]
    StrategyFailed { strategy: String, reason: String },

    #[error("strategy task panicked: {reason}")]
    TaskPanicked { reason: String },
}
