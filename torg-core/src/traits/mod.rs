//! Collaborator contracts at the core boundary. The engines depend on these
//! traits, never on a concrete store or embedding provider.

mod embedder;
mod repository;

pub use embedder::IEmbedder;
pub use repository::{IOrderRepository, IPairRepository, IProductRepository, TextField};
