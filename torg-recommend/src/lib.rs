//! Recommendation engine: co-occurrence pair index, collaborative and
//! content scorers, hybrid blending, and seasonal boosting.
//!
//! The pair index is maintained two ways. Orderline ingestion folds new
//! lines into the table inline, so recommendations stay fresh without a
//! batch job. A full recompute can be triggered at any time and runs as a
//! background task; over the same order history it converges to the exact
//! same table as incremental application.

pub mod blend;
pub mod boost;
pub mod collaborative;
pub mod content;
pub mod engine;
pub mod pair_builder;

pub use blend::HybridBlender;
pub use boost::SeasonalBooster;
pub use content::ContentScorer;
pub use engine::{RecommendEngine, SimilarAlgorithm};
pub use pair_builder::PairIndexBuilder;
