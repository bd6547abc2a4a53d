//! TorgRuntime: the composition root.
//!
//! Owns every engine and injects the shared repositories into them. No
//! module-level singletons; handlers reach everything through one
//! `Arc<TorgRuntime>` in the router state.

use std::path::Path;
use std::sync::{Arc, Mutex};

use torg_cache::CacheLayer;
use torg_core::config::TorgConfig;
use torg_core::traits::{
    IEmbedder, IOrderRepository, IPairRepository, IProductRepository,
};
use torg_core::{TorgError, TorgResult};
use torg_embeddings::EmbeddingEngine;
use torg_observability::{
    FeedbackEvent, HealthReporter, MetricsSnapshot, SearchMetrics, SearchRecord, StorageCounts,
};
use torg_recommend::RecommendEngine;
use torg_search::SearchEngine;
use torg_storage::StorageEngine;
use tracing::{info, warn};

pub struct TorgRuntime {
    pub(crate) storage: Arc<StorageEngine>,
    pub(crate) embedder: Arc<dyn IEmbedder>,
    pub(crate) search: SearchEngine,
    pub(crate) recommend: RecommendEngine,
    pub(crate) cache: CacheLayer,
    pub(crate) metrics: Mutex<SearchMetrics>,
    pub(crate) health: HealthReporter,
}

impl TorgRuntime {
    /// Wire the full service from configuration. A missing `db_path`
    /// yields an in-memory database.
    pub fn from_config(config: &TorgConfig) -> TorgResult<Self> {
        let storage = Arc::new(match &config.storage.db_path {
            Some(path) => StorageEngine::open(
                Path::new(path),
                config.storage.read_pool_size,
                config.embedding.dimension,
            )?,
            None => StorageEngine::open_in_memory(config.embedding.dimension)?,
        });
        let embedder: Arc<dyn IEmbedder> = Arc::new(EmbeddingEngine::new(&config.embedding)?);

        let products: Arc<dyn IProductRepository> = storage.clone();
        let orders: Arc<dyn IOrderRepository> = storage.clone();
        let pairs: Arc<dyn IPairRepository> = storage.clone();

        let search = SearchEngine::new(
            Arc::clone(&products),
            Arc::clone(&embedder),
            config.search.clone(),
        );
        let recommend = RecommendEngine::new(products, orders, pairs, config.recommend.clone());
        let cache = CacheLayer::new(&config.cache);

        info!(
            embedder = embedder.name(),
            dimension = embedder.dimension(),
            file_backed = config.storage.db_path.is_some(),
            "runtime assembled"
        );

        Ok(Self {
            storage,
            embedder,
            search,
            recommend,
            cache,
            metrics: Mutex::new(SearchMetrics::new()),
            health: HealthReporter::new(),
        })
    }

    /// Record one search into the metrics log. Search responses never fail
    /// on a metrics fault, so a poisoned lock only drops the record.
    pub(crate) fn record_search(&self, record: SearchRecord) {
        if let Ok(mut metrics) = self.metrics.lock() {
            metrics.record(record);
        }
    }

    pub(crate) fn record_feedback(&self, event: FeedbackEvent) -> TorgResult<()> {
        let mut metrics = self.lock_metrics()?;
        metrics.record_feedback(event);
        Ok(())
    }

    pub(crate) fn metrics_snapshot(&self) -> TorgResult<MetricsSnapshot> {
        Ok(self.lock_metrics()?.snapshot())
    }

    fn lock_metrics(&self) -> TorgResult<std::sync::MutexGuard<'_, SearchMetrics>> {
        self.metrics
            .lock()
            .map_err(|e| TorgError::internal(format!("metrics lock poisoned: {e}")))
    }

    /// Current storage counts, or `None` when any count query fails. The
    /// health endpoint reports degraded in that case instead of erroring.
    pub(crate) async fn storage_counts(&self) -> Option<StorageCounts> {
        let storage = Arc::clone(&self.storage);
        let counts = tokio::task::spawn_blocking(move || -> TorgResult<StorageCounts> {
            Ok(StorageCounts {
                products: storage.product_count()?,
                orderlines: storage.orderline_count()?,
                pairs: storage.pair_count()?,
            })
        })
        .await;

        match counts {
            Ok(Ok(counts)) => Some(counts),
            Ok(Err(e)) => {
                warn!(error = %e, "storage counts unavailable");
                None
            }
            Err(e) => {
                warn!(error = %e, "storage counts task lost");
                None
            }
        }
    }
}
