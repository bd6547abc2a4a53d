//! Service observability: a bounded search log with aggregate statistics,
//! a feedback log, and health reporting.

pub mod health;
pub mod metrics;

pub use health::{HealthReport, HealthReporter, HealthStatus, StorageCounts};
pub use metrics::{FeedbackEvent, MetricsSnapshot, PopularQuery, SearchMetrics, SearchRecord};
