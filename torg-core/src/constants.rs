/// Torg system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Embedding vector dimension (MiniLM-family sentence encoders).
pub const EMBEDDING_DIMENSION: usize = 384;

/// Minimum accepted query length after normalization.
pub const MIN_QUERY_LENGTH: usize = 3;

/// Score emitted for exact word-boundary matches.
pub const EXACT_MATCH_SCORE: f64 = 1.0;

/// Base score for substring (ngram) matches, before the coverage bonus.
pub const NGRAM_BASE_SCORE: f64 = 0.8;

/// Ceiling for ngram scores. Keeps every substring match strictly below an
/// exact match so fusion precedence stays meaningful.
pub const NGRAM_SCORE_CEILING: f64 = 0.99;

/// Scores within this distance are tie-broken by strategy precedence
/// (exact over ngram over vector) instead of raw magnitude.
pub const SCORE_EPSILON: f64 = 1e-6;

/// Capacity of the recent-search metrics ring buffer.
pub const SEARCH_METRICS_CAPACITY: usize = 1000;
