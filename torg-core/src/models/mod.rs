//! Shared data model for catalog, orders, search, and recommendations.
//!
//! Wire-facing structs serialize as camelCase to match the documented HTTP
//! surface; internal-only types keep Rust naming.

mod candidate;
mod facets;
mod grouping;
mod orderline;
mod pair_status;
mod product;
mod product_pair;
mod recommendation;

pub use candidate::{MatchType, ProductHit, SearchCandidate};
pub use facets::{FacetBucket, Facets};
pub use grouping::{BrandResult, CategoryResult};
pub use orderline::Orderline;
pub use pair_status::{PairIndexPhase, PairIndexStatus};
pub use product::{slugify, EmbeddingField, Product};
pub use product_pair::{canonical_key, ProductPair};
pub use recommendation::{RecommendationScore, RecommendedProduct};
