use crate::errors::TorgResult;

/// Embedding provider: text in, fixed-dimension vector out.
///
/// Implementations bound their own latency. A slow or failed embed degrades
/// vector search for that request; it never fails the request itself.
pub trait IEmbedder: Send + Sync {
    /// Embed a single text.
    fn embed(&self, text: &str) -> TorgResult<Vec<f32>>;

    /// Embed a batch of texts, preserving order.
    fn embed_batch(&self, texts: &[String]) -> TorgResult<Vec<Vec<f32>>>;

    /// Dimensionality of produced vectors.
    fn dimension(&self) -> usize;

    /// Provider name for logs and explain output.
    fn name(&self) -> &str;
}
