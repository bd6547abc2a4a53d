use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of the background pair computation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairIndexPhase {
    /// No full recompute has run in this process yet. Incremental updates
    /// may still have populated the table.
    Idle,
    Processing,
    Completed,
    Failed,
}

/// Snapshot of the pair index state, served by the status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairIndexStatus {
    pub status: PairIndexPhase,
    pub pair_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
