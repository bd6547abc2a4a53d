//! SearchEngine: plans a query, runs the match strategies as parallel
//! blocking tasks, fuses and facets the results.
//!
//! Degradation rules: a strategy that fails, panics, or overruns its
//! deadline contributes nothing and logs a warning. The request itself
//! only fails on validation.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use torg_core::config::{defaults, SearchConfig};
use torg_core::errors::SearchError;
use torg_core::models::{
    BrandResult, CategoryResult, Facets, MatchType, ProductHit, SearchCandidate,
};
use torg_core::traits::{IEmbedder, IProductRepository};
use torg_core::TorgResult;
use tracing::{debug, info, warn};

use crate::matchers::{ExactMatcher, NgramMatcher, VectorMatcher};
use crate::planner::{PlannedStrategy, QueryPlan, QueryPlanner};
use crate::suggest::Suggestion;
use crate::{facets, fuser, grouped, suggest};

/// Parameters for one search call. The HTTP layer fills these from the
/// request body; defaults mirror the documented API defaults.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub max_categories: usize,
    pub max_brands: usize,
    pub max_products: usize,
    pub include_vector_search: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_categories: defaults::DEFAULT_MAX_CATEGORIES,
            max_brands: defaults::DEFAULT_MAX_BRANDS,
            max_products: defaults::DEFAULT_MAX_PRODUCTS,
            include_vector_search: true,
        }
    }
}

/// Consolidated search result: grouped entities plus ranked products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub categories: Vec<CategoryResult>,
    pub brands: Vec<BrandResult>,
    pub products: Vec<ProductHit>,
    pub total_results: usize,
}

/// Products-only search result with facets over the full matched set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearchOutcome {
    pub products: Vec<ProductHit>,
    pub facets: Facets,
    pub total_results: usize,
}

/// Per-strategy accounting for the explain surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyExplain {
    pub strategy: MatchType,
    pub cap: usize,
    pub matched: usize,
    pub degraded: bool,
    /// Best candidates this strategy produced, before fusion.
    pub top_candidates: Vec<SearchCandidate>,
}

/// Plan and execution debug output for one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryExplainOutcome {
    pub query: String,
    pub normalized_query: String,
    pub tokens: Vec<String>,
    pub strategies: Vec<StrategyExplain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_sample: Option<Vec<f32>>,
}

struct StrategyOutcome {
    planned: PlannedStrategy,
    hits: Vec<ProductHit>,
    degraded: bool,
}

/// The search orchestrator. Cheap to clone via its shared collaborators.
pub struct SearchEngine {
    repository: Arc<dyn IProductRepository>,
    embedder: Arc<dyn IEmbedder>,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(
        repository: Arc<dyn IProductRepository>,
        embedder: Arc<dyn IEmbedder>,
        config: SearchConfig,
    ) -> Self {
        Self {
            repository,
            embedder,
            config,
        }
    }

    /// Full consolidated search: categories, brands, and fused products.
    pub async fn consolidated_search(&self, request: &SearchRequest) -> TorgResult<SearchOutcome> {
        let plan = QueryPlanner::plan(&request.query, request.include_vector_search, &self.config)?;
        info!(
            query = %plan.normalized_query,
            strategies = plan.strategies.len(),
            "search planned"
        );

        let request_deadline =
            Instant::now() + Duration::from_millis(self.config.request_timeout_ms);

        // Grouped lookups run beside the product strategies.
        let categories_handle = {
            let repository = Arc::clone(&self.repository);
            let query = plan.normalized_query.clone();
            let max = request.max_categories;
            tokio::task::spawn_blocking(move || {
                grouped::search_categories(repository.as_ref(), &query, max)
            })
        };
        let brands_handle = {
            let repository = Arc::clone(&self.repository);
            let query = plan.normalized_query.clone();
            let max = request.max_brands;
            tokio::task::spawn_blocking(move || {
                grouped::search_brands(repository.as_ref(), &query, max)
            })
        };

        let outcomes = self.run_strategies(&plan).await;
        let fused = fuser::fuse(outcomes.into_iter().map(|o| o.hits).collect());
        debug!(total = fused.len(), "fusion complete");

        let categories =
            join_or_default(categories_handle, request_deadline, "category grouping").await;
        let brands = join_or_default(brands_handle, request_deadline, "brand grouping").await;

        let total_results = fused.len();
        let products = truncate_hits(fused, request.max_products);

        Ok(SearchOutcome {
            categories,
            brands,
            products,
            total_results,
        })
    }

    /// Products-only search with facets computed before truncation.
    pub async fn product_search(
        &self,
        request: &SearchRequest,
    ) -> TorgResult<ProductSearchOutcome> {
        let plan = QueryPlanner::plan(&request.query, request.include_vector_search, &self.config)?;
        info!(
            query = %plan.normalized_query,
            strategies = plan.strategies.len(),
            "search planned"
        );

        let outcomes = self.run_strategies(&plan).await;
        let fused = fuser::fuse(outcomes.into_iter().map(|o| o.hits).collect());
        debug!(total = fused.len(), "fusion complete");

        let facets = facets::aggregate(&fused);
        let total_results = fused.len();
        let products = truncate_hits(fused, request.max_products);

        Ok(ProductSearchOutcome {
            products,
            facets,
            total_results,
        })
    }

    /// Typeahead suggestions for a title prefix.
    pub async fn autosuggest(
        &self,
        prefix: &str,
        limit: Option<usize>,
    ) -> TorgResult<Vec<Suggestion>> {
        let limit = limit.unwrap_or(self.config.suggest_limit);
        let repository = Arc::clone(&self.repository);
        let prefix = prefix.to_string();

        tokio::task::spawn_blocking(move || suggest::autosuggest(repository.as_ref(), &prefix, limit))
            .await
            .map_err(|e| SearchError::TaskPanicked {
                reason: e.to_string(),
            })?
    }

    /// Plan debug: strategy set, per-strategy match counts, embedding
    /// sample. Validation failures surface exactly as in real search.
    pub async fn explain(
        &self,
        query: &str,
        include_vector_search: bool,
    ) -> TorgResult<QueryExplainOutcome> {
        let plan = QueryPlanner::plan(query, include_vector_search, &self.config)?;
        let outcomes = self.run_strategies(&plan).await;

        let embedding_sample = if plan.includes(MatchType::Vector) {
            self.sample_embedding(&plan.normalized_query).await
        } else {
            None
        };

        let strategies = outcomes
            .iter()
            .map(|o| StrategyExplain {
                strategy: o.planned.strategy,
                cap: o.planned.cap,
                matched: o.hits.len(),
                degraded: o.degraded,
                top_candidates: o.hits.iter().take(5).map(ProductHit::candidate).collect(),
            })
            .collect();

        Ok(QueryExplainOutcome {
            query: plan.raw_query,
            normalized_query: plan.normalized_query,
            tokens: plan.tokens,
            strategies,
            embedding_sample,
        })
    }

    /// First components of the query embedding, for explain output. The
    /// embedding cache makes this a cheap second lookup after the vector
    /// strategy ran.
    async fn sample_embedding(&self, normalized_query: &str) -> Option<Vec<f32>> {
        let embedder = Arc::clone(&self.embedder);
        let query = normalized_query.to_string();
        let result = tokio::task::spawn_blocking(move || embedder.embed(&query)).await;

        match result {
            Ok(Ok(embedding)) => Some(embedding.into_iter().take(10).collect()),
            Ok(Err(e)) => {
                warn!(error = %e, "embedding sample unavailable");
                None
            }
            Err(e) => {
                warn!(error = %e, "embedding sample task failed");
                None
            }
        }
    }

    /// Spawn every planned strategy, then join them against a shared
    /// deadline. Each strategy degrades independently.
    async fn run_strategies(&self, plan: &QueryPlan) -> Vec<StrategyOutcome> {
        let deadline = Instant::now() + Duration::from_millis(self.config.strategy_timeout_ms);

        let mut handles: Vec<(PlannedStrategy, JoinHandle<TorgResult<Vec<ProductHit>>>)> =
            Vec::with_capacity(plan.strategies.len());

        for planned in &plan.strategies {
            let repository = Arc::clone(&self.repository);
            let query = plan.normalized_query.clone();
            let handle = match planned.strategy {
                MatchType::Exact => {
                    let matcher = ExactMatcher::new(planned.cap);
                    tokio::task::spawn_blocking(move || matcher.run(repository.as_ref(), &query))
                }
                MatchType::Ngram => {
                    let matcher =
                        NgramMatcher::new(planned.cap, self.config.ngram_min, self.config.ngram_max);
                    tokio::task::spawn_blocking(move || matcher.run(repository.as_ref(), &query))
                }
                MatchType::Vector => {
                    let matcher =
                        VectorMatcher::new(self.config.vector_similarity_threshold, planned.cap);
                    let embedder = Arc::clone(&self.embedder);
                    tokio::task::spawn_blocking(move || {
                        matcher.run(repository.as_ref(), embedder.as_ref(), &query)
                    })
                }
            };
            handles.push((*planned, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (planned, handle) in handles {
            let outcome = match tokio::time::timeout_at(deadline, handle).await {
                Ok(Ok(Ok(hits))) => {
                    debug!(strategy = %planned.strategy, matched = hits.len(), "strategy complete");
                    StrategyOutcome {
                        planned,
                        hits,
                        degraded: false,
                    }
                }
                Ok(Ok(Err(e))) => {
                    warn!(strategy = %planned.strategy, error = %e, "strategy failed, degrading");
                    StrategyOutcome {
                        planned,
                        hits: Vec::new(),
                        degraded: true,
                    }
                }
                Ok(Err(join_error)) => {
                    let e = SearchError::TaskPanicked {
                        reason: join_error.to_string(),
                    };
                    warn!(strategy = %planned.strategy, error = %e, "strategy task lost, degrading");
                    StrategyOutcome {
                        planned,
                        hits: Vec::new(),
                        degraded: true,
                    }
                }
                Err(_) => {
                    warn!(
                        strategy = %planned.strategy,
                        timeout_ms = self.config.strategy_timeout_ms,
                        "strategy timed out, degrading"
                    );
                    StrategyOutcome {
                        planned,
                        hits: Vec::new(),
                        degraded: true,
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

/// Truncate the fused list for the response and drop embedding payloads
/// from the documents.
fn truncate_hits(mut fused: Vec<ProductHit>, max_products: usize) -> Vec<ProductHit> {
    fused.truncate(max_products);
    fused
        .into_iter()
        .map(|mut hit| {
            hit.product = hit.product.without_embeddings();
            hit
        })
        .collect()
}

/// Join a grouped-lookup task; any failure or deadline overrun degrades to
/// an empty group.
async fn join_or_default<T>(
    handle: JoinHandle<TorgResult<Vec<T>>>,
    deadline: Instant,
    what: &str,
) -> Vec<T> {
    match tokio::time::timeout_at(deadline, handle).await {
        Ok(Ok(Ok(items))) => items,
        Ok(Ok(Err(e))) => {
            warn!(error = %e, "{what} failed, degrading");
            Vec::new()
        }
        Ok(Err(e)) => {
            warn!(error = %e, "{what} task lost, degrading");
            Vec::new()
        }
        Err(_) => {
            warn!("{what} timed out, degrading");
            Vec::new()
        }
    }
}
