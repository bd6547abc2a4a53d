//! Query modules. Each takes a `&Connection` so the engine decides whether
//! the writer or a pooled reader runs it.

pub mod orders;
pub mod pairs;
pub mod product_crud;
pub mod text_search;
pub mod vector_search;
