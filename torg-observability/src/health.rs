//! Health reporting: storage counts and process uptime.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Overall service state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Row counts read from storage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageCounts {
    pub products: u64,
    pub orderlines: u64,
    pub pairs: u64,
}

/// The health endpoint body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: HealthStatus,
    pub products: u64,
    pub orderlines: u64,
    pub pairs: u64,
    pub uptime_secs: u64,
}

/// Builds health reports against the process start time.
#[derive(Debug, Clone)]
pub struct HealthReporter {
    started: Instant,
}

impl HealthReporter {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// Storage counts present means healthy; a storage failure degrades the
    /// report instead of failing the endpoint.
    pub fn report(&self, counts: Option<StorageCounts>) -> HealthReport {
        match counts {
            Some(counts) => HealthReport {
                status: HealthStatus::Healthy,
                products: counts.products,
                orderlines: counts.orderlines,
                pairs: counts.pairs,
                uptime_secs: self.uptime_secs(),
            },
            None => HealthReport {
                status: HealthStatus::Degraded,
                products: 0,
                orderlines: 0,
                pairs: 0,
                uptime_secs: self.uptime_secs(),
            },
        }
    }
}

impl Default for HealthReporter {
    fn default() -> Self {
        Self::new()
    }
}
