//! Query planning: normalization, validation, strategy selection.

use torg_core::config::SearchConfig;
use torg_core::constants::MIN_QUERY_LENGTH;
use torg_core::models::MatchType;
use torg_core::{TorgError, TorgResult};

/// One strategy scheduled for a query, with its candidate cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStrategy {
    pub strategy: MatchType,
    pub cap: usize,
}

/// The resolved plan for a query.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub raw_query: String,
    pub normalized_query: String,
    pub tokens: Vec<String>,
    pub strategies: Vec<PlannedStrategy>,
}

impl QueryPlan {
    /// Whether a given strategy was planned.
    pub fn includes(&self, strategy: MatchType) -> bool {
        self.strategies.iter().any(|p| p.strategy == strategy)
    }
}

/// Stateless planner. Normalizes, validates, and picks strategies.
pub struct QueryPlanner;

impl QueryPlanner {
    /// Trim and case-fold a raw query. `to_lowercase` is full Unicode, so
    /// æ/ø/å/ä/ö survive folding intact.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    /// Build the plan for a query.
    ///
    /// Exact and ngram always run. Vector runs only when the caller asked
    /// for it and the query has at least two tokens; single-token queries
    /// are served well enough by the text strategies to skip the embedding
    /// round-trip.
    pub fn plan(
        raw_query: &str,
        include_vector_search: bool,
        config: &SearchConfig,
    ) -> TorgResult<QueryPlan> {
        let normalized_query = Self::normalize(raw_query);
        if normalized_query.chars().count() < MIN_QUERY_LENGTH {
            return Err(TorgError::validation(format!(
                "query must be at least {MIN_QUERY_LENGTH} characters"
            )));
        }

        let tokens: Vec<String> = normalized_query
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let mut strategies = vec![
            PlannedStrategy {
                strategy: MatchType::Exact,
                cap: config.strategy_cap,
            },
            PlannedStrategy {
                strategy: MatchType::Ngram,
                cap: config.strategy_cap,
            },
        ];
        if include_vector_search && tokens.len() >= 2 {
            strategies.push(PlannedStrategy {
                strategy: MatchType::Vector,
                cap: config.vector_k,
            });
        }

        Ok(QueryPlan {
            raw_query: raw_query.to_string(),
            normalized_query,
            tokens,
            strategies,
        })
    }
}
