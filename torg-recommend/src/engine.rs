//! RecommendEngine: facade over the pair index, the scorers, the blender,
//! and seasonal boosting. Repository work runs on the blocking pool.

use std::str::FromStr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use torg_core::config::RecommendConfig;
use torg_core::errors::{RecommendError, TorgError, TorgResult};
use torg_core::models::{Orderline, PairIndexStatus, Product, RecommendedProduct};
use torg_core::traits::{IOrderRepository, IPairRepository, IProductRepository};

use crate::blend::HybridBlender;
use crate::boost::SeasonalBooster;
use crate::collaborative;
use crate::content::ContentScorer;
use crate::pair_builder::PairIndexBuilder;

/// Scoring algorithm for the similar-products endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarAlgorithm {
    /// Pair counts around the seed product.
    CoOccurrence,
    /// Embedding similarity to the seed product.
    Embedding,
    /// Blend of both.
    Hybrid,
}

impl FromStr for SimilarAlgorithm {
    type Err = TorgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "co_occurrence" => Ok(Self::CoOccurrence),
            "embedding" => Ok(Self::Embedding),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(RecommendError::UnknownAlgorithm {
                name: other.to_string(),
            }
            .into()),
        }
    }
}

impl SimilarAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CoOccurrence => "co_occurrence",
            Self::Embedding => "embedding",
            Self::Hybrid => "hybrid",
        }
    }
}

/// The recommendation facade handed to the API layer.
pub struct RecommendEngine {
    products: Arc<dyn IProductRepository>,
    orders: Arc<dyn IOrderRepository>,
    pairs: Arc<dyn IPairRepository>,
    builder: Arc<PairIndexBuilder>,
    content: ContentScorer,
    blender: HybridBlender,
    booster: SeasonalBooster,
    config: RecommendConfig,
}

impl RecommendEngine {
    pub fn new(
        products: Arc<dyn IProductRepository>,
        orders: Arc<dyn IOrderRepository>,
        pairs: Arc<dyn IPairRepository>,
        config: RecommendConfig,
    ) -> Self {
        let builder = Arc::new(PairIndexBuilder::new(
            Arc::clone(&orders),
            Arc::clone(&pairs),
        ));
        Self {
            content: ContentScorer::new(&config),
            blender: HybridBlender::new(&config),
            booster: SeasonalBooster::new(&config),
            products,
            orders,
            pairs,
            builder,
            config,
        }
    }

    /// Ingest one orderline. The incremental pair update completes before
    /// this returns, so recommendations immediately reflect the order.
    /// Returns false for a replayed line.
    pub async fn ingest_orderline(&self, line: Orderline) -> TorgResult<bool> {
        let builder = Arc::clone(&self.builder);
        join_blocking(tokio::task::spawn_blocking(move || {
            builder.ingest_orderline(&line)
        }))
        .await
    }

    /// Start a background full recompute unless one is already running,
    /// then report the status snapshot.
    pub async fn trigger_pair_rebuild(&self) -> TorgResult<PairIndexStatus> {
        if self.builder.trigger_rebuild()? {
            info!("pair index rebuild started");
        }
        self.pair_status().await
    }

    pub async fn pair_status(&self) -> TorgResult<PairIndexStatus> {
        let builder = Arc::clone(&self.builder);
        join_blocking(tokio::task::spawn_blocking(move || builder.status())).await
    }

    /// Collaborative recommendations for a customer.
    pub async fn collaborative_for_user(
        &self,
        customer_nr: &str,
        limit: Option<usize>,
    ) -> TorgResult<Vec<RecommendedProduct>> {
        self.ensure_ready().await?;
        let limit = self.clamp_limit(limit);
        let products = Arc::clone(&self.products);
        let orders = Arc::clone(&self.orders);
        let pairs = Arc::clone(&self.pairs);
        let customer = customer_nr.to_string();
        let scored = join_blocking(tokio::task::spawn_blocking(move || {
            collaborative::recommend_for_customer(
                products.as_ref(),
                orders.as_ref(),
                pairs.as_ref(),
                &customer,
                limit,
            )
        }))
        .await?;
        debug!(customer_nr, count = scored.len(), "collaborative recommendations");
        Ok(into_recommended(scored))
    }

    /// Hybrid recommendations for a customer: collaborative candidates
    /// blended with content candidates seeded from the most recent purchase.
    pub async fn hybrid_for_user(
        &self,
        customer_nr: &str,
        limit: Option<usize>,
    ) -> TorgResult<Vec<RecommendedProduct>> {
        self.ensure_ready().await?;
        let limit = self.clamp_limit(limit);
        let pool = self.candidate_pool(limit);
        let products = Arc::clone(&self.products);
        let orders = Arc::clone(&self.orders);
        let pairs = Arc::clone(&self.pairs);
        let content = self.content.clone();
        let blender = self.blender.clone();
        let customer = customer_nr.to_string();
        let mut blended = join_blocking(tokio::task::spawn_blocking(move || {
            let by_history = collaborative::recommend_for_customer(
                products.as_ref(),
                orders.as_ref(),
                pairs.as_ref(),
                &customer,
                pool,
            )?;
            let by_content = match orders.latest_purchase(&customer)? {
                Some(seed_id) => match products.get_product(&seed_id)? {
                    Some(seed) => content.similar_to(products.as_ref(), &seed, pool)?,
                    None => Vec::new(),
                },
                None => Vec::new(),
            };
            Ok(blender.blend(by_history, by_content))
        }))
        .await?;
        blended.truncate(limit);
        debug!(customer_nr, count = blended.len(), "hybrid recommendations");
        Ok(blended
            .into_iter()
            .map(|(product, score)| RecommendedProduct {
                product: product.without_embeddings(),
                score: score.hybrid_score,
            })
            .collect())
    }

    /// Content-based recommendations from a seed product.
    pub async fn content_based(
        &self,
        product_id: &str,
        limit: Option<usize>,
    ) -> TorgResult<Vec<RecommendedProduct>> {
        let limit = self.clamp_limit(limit);
        let products = Arc::clone(&self.products);
        let content = self.content.clone();
        let id = product_id.to_string();
        let scored = join_blocking(tokio::task::spawn_blocking(move || {
            let seed = products
                .get_product(&id)?
                .ok_or_else(|| TorgError::not_found("product", id.clone()))?;
            content.similar_to(products.as_ref(), &seed, limit)
        }))
        .await?;
        Ok(into_recommended(scored))
    }

    /// Products most often in the same orders as the given product. An
    /// unknown product simply has no pairs and yields an empty list.
    pub async fn frequently_bought_together(
        &self,
        product_id: &str,
        limit: Option<usize>,
    ) -> TorgResult<Vec<RecommendedProduct>> {
        let limit = self.clamp_limit(limit);
        let products = Arc::clone(&self.products);
        let pairs = Arc::clone(&self.pairs);
        let id = product_id.to_string();
        let scored = join_blocking(tokio::task::spawn_blocking(move || {
            collaborative::frequently_bought_with(products.as_ref(), pairs.as_ref(), &id, limit)
        }))
        .await?;
        Ok(into_recommended(scored))
    }

    /// Similar products for a seed, by the requested algorithm, with
    /// seasonal and commercial boosts applied before the final cut. The
    /// season comes from the request or falls back to the dominant season
    /// in the order history.
    pub async fn similar(
        &self,
        product_id: &str,
        algorithm: SimilarAlgorithm,
        limit: Option<usize>,
        season: Option<String>,
    ) -> TorgResult<Vec<RecommendedProduct>> {
        let limit = self.clamp_limit(limit);
        let pool = self.candidate_pool(limit);
        let products = Arc::clone(&self.products);
        let orders = Arc::clone(&self.orders);
        let pairs = Arc::clone(&self.pairs);
        let content = self.content.clone();
        let blender = self.blender.clone();
        let booster = self.booster.clone();
        let id = product_id.to_string();
        let mut scored = join_blocking(tokio::task::spawn_blocking(move || {
            let seed = products
                .get_product(&id)?
                .ok_or_else(|| TorgError::not_found("product", id.clone()))?;
            let mut scored = match algorithm {
                SimilarAlgorithm::CoOccurrence => collaborative::frequently_bought_with(
                    products.as_ref(),
                    pairs.as_ref(),
                    &id,
                    pool,
                )?,
                SimilarAlgorithm::Embedding => {
                    content.similar_to(products.as_ref(), &seed, pool)?
                }
                SimilarAlgorithm::Hybrid => {
                    let by_pairs = collaborative::frequently_bought_with(
                        products.as_ref(),
                        pairs.as_ref(),
                        &id,
                        pool,
                    )?;
                    let by_content = content.similar_to(products.as_ref(), &seed, pool)?;
                    blender
                        .blend(by_pairs, by_content)
                        .into_iter()
                        .map(|(product, score)| (product, score.hybrid_score))
                        .collect()
                }
            };
            let season_in_effect = match season {
                Some(name) => Some(name),
                None => orders.dominant_season()?,
            };
            booster.apply(&mut scored, season_in_effect.as_deref());
            Ok(scored)
        }))
        .await?;
        scored.truncate(limit);
        debug!(
            product_id,
            algorithm = algorithm.as_str(),
            count = scored.len(),
            "similar products"
        );
        Ok(into_recommended(scored))
    }

    /// Collaborative paths need pair data to say anything. A never-built,
    /// never-fed index is reported as not ready rather than silently empty.
    async fn ensure_ready(&self) -> TorgResult<()> {
        let builder = Arc::clone(&self.builder);
        let fresh =
            join_blocking(tokio::task::spawn_blocking(move || builder.never_populated())).await?;
        if fresh {
            return Err(TorgError::RecommenderNotReady);
        }
        Ok(())
    }

    fn clamp_limit(&self, limit: Option<usize>) -> usize {
        limit
            .unwrap_or(self.config.default_limit)
            .clamp(1, self.config.max_limit.max(1))
    }

    /// Scorers feed the blender and the booster from a wider pool than the
    /// final cut, so late reordering can pull candidates up into it.
    fn candidate_pool(&self, limit: usize) -> usize {
        self.config.max_limit.max(limit)
    }
}

fn into_recommended(scored: Vec<(Product, f64)>) -> Vec<RecommendedProduct> {
    scored
        .into_iter()
        .map(|(product, score)| RecommendedProduct {
            product: product.without_embeddings(),
            score,
        })
        .collect()
}

async fn join_blocking<T>(handle: JoinHandle<TorgResult<T>>) -> TorgResult<T> {
    match handle.await {
        Ok(result) => result,
        Err(err) => Err(TorgError::internal(format!(
            "recommendation task panicked: {err}"
        ))),
    }
}
