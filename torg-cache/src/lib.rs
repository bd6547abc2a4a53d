//! Response caching: content-addressed keys, per-namespace TTL and
//! capacity, single-flight computation, hit/miss accounting.

pub mod fingerprint;
pub mod layer;

pub use fingerprint::fingerprint;
pub use layer::{CacheLayer, CacheNamespace, CacheStats, NamespaceStats};
