//! Search metrics: a bounded log of recent searches and feedback events,
//! aggregated for the stats endpoint.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use torg_core::constants::SEARCH_METRICS_CAPACITY;

const POPULAR_QUERY_LIMIT: usize = 10;

/// One recorded search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub query: String,
    pub result_count: usize,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
    pub cache_hit: bool,
}

impl SearchRecord {
    /// New record stamped with the current time.
    pub fn new(
        query: impl Into<String>,
        result_count: usize,
        duration_ms: u64,
        cache_hit: bool,
    ) -> Self {
        Self {
            query: query.into(),
            result_count,
            duration_ms,
            timestamp: Utc::now(),
            cache_hit,
        }
    }
}

/// A feedback event posted by a caller. The timestamp is stamped at
/// deserialization when the caller does not send one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEvent {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub action: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// One entry of the popular-queries leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularQuery {
    pub query: String,
    pub count: u64,
}

/// Aggregate view served by the stats endpoint. Window statistics cover the
/// retained records only; `total_searches` keeps counting past the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_searches: u64,
    pub recorded_searches: usize,
    pub average_duration_ms: f64,
    pub cache_hit_rate: f64,
    pub feedback_events: usize,
    pub popular_queries: Vec<PopularQuery>,
}

/// Bounded in-memory log of recent searches. Oldest entries fall off once
/// the capacity is reached.
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    records: Vec<SearchRecord>,
    feedback: Vec<FeedbackEvent>,
    capacity: usize,
    total_searches: u64,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::with_capacity(SEARCH_METRICS_CAPACITY)
    }

    /// Create with a custom capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            feedback: Vec::new(),
            capacity,
            total_searches: 0,
        }
    }

    /// Record one search.
    pub fn record(&mut self, record: SearchRecord) {
        tracing::debug!(
            query = %record.query,
            result_count = record.result_count,
            duration_ms = record.duration_ms,
            cache_hit = record.cache_hit,
            "search recorded"
        );
        self.total_searches += 1;
        self.records.push(record);
        if self.records.len() > self.capacity {
            let excess = self.records.len() - self.capacity;
            self.records.drain(..excess);
        }
    }

    /// Record a feedback event.
    pub fn record_feedback(&mut self, event: FeedbackEvent) {
        tracing::debug!(query = %event.query, action = %event.action, "feedback recorded");
        self.feedback.push(event);
        if self.feedback.len() > self.capacity {
            let excess = self.feedback.len() - self.capacity;
            self.feedback.drain(..excess);
        }
    }

    /// The retained records, oldest first.
    pub fn recent(&self) -> &[SearchRecord] {
        &self.records
    }

    pub fn feedback(&self) -> &[FeedbackEvent] {
        &self.feedback
    }

    pub fn total_searches(&self) -> u64 {
        self.total_searches
    }

    /// Average duration over the retained window.
    pub fn average_duration_ms(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total: u64 = self.records.iter().map(|r| r.duration_ms).sum();
        total as f64 / self.records.len() as f64
    }

    /// Share of retained searches answered from cache.
    pub fn cache_hit_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let hits = self.records.iter().filter(|r| r.cache_hit).count();
        hits as f64 / self.records.len() as f64
    }

    /// The most frequent queries in the retained window, count desc then
    /// query asc, at most `n`.
    pub fn popular_queries(&self, n: usize) -> Vec<PopularQuery> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for record in &self.records {
            *counts.entry(record.query.as_str()).or_insert(0) += 1;
        }
        let mut popular: Vec<PopularQuery> = counts
            .into_iter()
            .map(|(query, count)| PopularQuery {
                query: query.to_string(),
                count,
            })
            .collect();
        popular.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.query.cmp(&b.query)));
        popular.truncate(n);
        popular
    }

    /// Aggregate snapshot for the stats endpoint.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_searches: self.total_searches,
            recorded_searches: self.records.len(),
            average_duration_ms: self.average_duration_ms(),
            cache_hit_rate: self.cache_hit_rate(),
            feedback_events: self.feedback.len(),
            popular_queries: self.popular_queries(POPULAR_QUERY_LIMIT),
        }
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}
