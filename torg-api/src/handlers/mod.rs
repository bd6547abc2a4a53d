//! Request handlers, grouped by surface.

pub mod ingest;
pub mod meta;
pub mod recommend;
pub mod search;
