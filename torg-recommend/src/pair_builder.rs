//! PairIndexBuilder: incremental co-occurrence updates inline with
//! ingestion, plus a guarded full recompute running as a background task.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{error, info};

use torg_core::errors::{RecommendError, TorgError, TorgResult};
use torg_core::models::{Orderline, PairIndexPhase, PairIndexStatus};
use torg_core::traits::{IOrderRepository, IPairRepository};

/// Job state behind the builder's lock. The pair count is not mirrored
/// here; status snapshots read it live from the repository.
#[derive(Debug)]
struct BuilderState {
    phase: PairIndexPhase,
    last_run: Option<DateTime<Utc>>,
    error: Option<String>,
}

/// Maintains the co-occurrence pair table.
///
/// Incremental updates run before orderline ingestion reports success, so a
/// caller that ingests an order can immediately ask for recommendations
/// built on it. The full recompute never blocks a request path: it is
/// spawned onto the runtime and only one runs at a time.
pub struct PairIndexBuilder {
    orders: Arc<dyn IOrderRepository>,
    pairs: Arc<dyn IPairRepository>,
    state: Mutex<BuilderState>,
}

impl PairIndexBuilder {
    pub fn new(orders: Arc<dyn IOrderRepository>, pairs: Arc<dyn IPairRepository>) -> Self {
        Self {
            orders,
            pairs,
            state: Mutex::new(BuilderState {
                phase: PairIndexPhase::Idle,
                last_run: None,
                error: None,
            }),
        }
    }

    /// Ingest one orderline and fold it into the pair table.
    ///
    /// Returns false when the `(order_nr, product_nr)` line already existed;
    /// replayed lines form no new pairs. A newly inserted line pairs its
    /// product with every other distinct product already in the order.
    pub fn ingest_orderline(&self, line: &Orderline) -> TorgResult<bool> {
        let inserted = self.orders.insert_orderline(line)?;
        if !inserted {
            return Ok(false);
        }
        let members = self.orders.products_in_order(&line.order_nr)?;
        for other in members.iter().filter(|id| *id != &line.product_nr) {
            self.pairs.upsert_pair(&line.product_nr, other, 1)?;
        }
        Ok(true)
    }

    /// Rebuild the pair table from the full order history. Synchronous; the
    /// background job wraps it in `spawn_blocking`. Returns the number of
    /// pair increments applied.
    pub fn rebuild(&self) -> TorgResult<u64> {
        self.pairs.clear_pairs()?;
        let groups = self.orders.all_order_groups()?;
        let mut increments = 0u64;
        for (_, members) in &groups {
            for i in 0..members.len() {
                for j in (i + 1)..members.len() {
                    self.pairs.upsert_pair(&members[i], &members[j], 1)?;
                    increments += 1;
                }
            }
        }
        Ok(increments)
    }

    /// Start a background full recompute. Returns false when one is already
    /// running; a second trigger never stacks a second job.
    ///
    /// Must be called from within a tokio runtime. Does not touch storage
    /// itself, so it is safe on an async thread.
    pub fn trigger_rebuild(self: &Arc<Self>) -> TorgResult<bool> {
        {
            let mut state = self.lock_state()?;
            if state.phase == PairIndexPhase::Processing {
                return Ok(false);
            }
            state.phase = PairIndexPhase::Processing;
            state.error = None;
        }

        let builder = Arc::clone(self);
        tokio::spawn(async move {
            let worker = Arc::clone(&builder);
            let outcome = tokio::task::spawn_blocking(move || worker.rebuild()).await;
            if let Ok(mut state) = builder.state.lock() {
                match outcome {
                    Ok(Ok(increments)) => {
                        state.phase = PairIndexPhase::Completed;
                        state.last_run = Some(Utc::now());
                        state.error = None;
                        info!(increments, "pair index rebuilt");
                    }
                    Ok(Err(err)) => {
                        state.phase = PairIndexPhase::Failed;
                        state.error = Some(err.to_string());
                        error!(error = %err, "pair index rebuild failed");
                    }
                    Err(join_err) => {
                        let err = RecommendError::ComputeFailed {
                            reason: format!("rebuild task panicked: {join_err}"),
                        };
                        state.phase = PairIndexPhase::Failed;
                        state.error = Some(err.to_string());
                        error!(error = %err, "pair index rebuild failed");
                    }
                }
            }
        });

        Ok(true)
    }

    /// Snapshot of the job state plus the live pair count.
    pub fn status(&self) -> TorgResult<PairIndexStatus> {
        let pair_count = self.pairs.pair_count()?;
        let state = self.lock_state()?;
        Ok(PairIndexStatus {
            status: state.phase,
            pair_count,
            last_run: state.last_run,
            error: state.error.clone(),
        })
    }

    /// True when no recompute has ever run and the table is empty. The
    /// distinction matters: a completed run over single-item orders leaves
    /// an empty table that still counts as ready.
    pub fn never_populated(&self) -> TorgResult<bool> {
        if self.pairs.pair_count()? > 0 {
            return Ok(false);
        }
        let state = self.lock_state()?;
        Ok(state.phase == PairIndexPhase::Idle)
    }

    fn lock_state(&self) -> TorgResult<MutexGuard<'_, BuilderState>> {
        self.state
            .lock()
            .map_err(|e| TorgError::internal(format!("pair builder state lock poisoned: {e}")))
    }
}
