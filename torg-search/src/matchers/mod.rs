//! Match strategies. Each strategy is independent and synchronous; the
//! engine wraps them in blocking tasks and joins with a deadline.

mod exact;
mod ngram;
mod vector;

pub use exact::ExactMatcher;
pub use ngram::NgramMatcher;
pub use vector::VectorMatcher;
