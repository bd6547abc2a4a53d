//! torg-search: query resolution from raw text to ranked, faceted results.
//!
//! Pipeline: plan (normalize + strategy selection) → run match strategies as
//! parallel tasks → fuse (dedup + rank) → facet + group → respond. Strategy
//! failures degrade that strategy only; the request always answers with
//! whatever the surviving strategies found.

pub mod engine;
pub mod facets;
pub mod fuser;
pub mod grouped;
pub mod matchers;
pub mod planner;
pub mod suggest;

pub use engine::{
    ProductSearchOutcome, QueryExplainOutcome, SearchEngine, SearchOutcome, SearchRequest,
    StrategyExplain,
};
pub use planner::{PlannedStrategy, QueryPlan, QueryPlanner};
pub use suggest::Suggestion;
