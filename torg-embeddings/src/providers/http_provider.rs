//! HTTP embedding provider.
//!
//! Posts `{"texts": [...]}` to a configured endpoint and expects
//! `{"embeddings": [[f32]]}` back, one vector per input in order. All
//! transport and shape failures map onto [`EmbeddingError`] so the caller
//! can degrade instead of failing the request.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use torg_core::errors::EmbeddingError;
use torg_core::traits::IEmbedder;
use torg_core::TorgResult;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    texts: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Remote embedding provider speaking the batch JSON protocol.
pub struct HttpProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    dimension: usize,
    timeout_ms: u64,
}

impl HttpProvider {
    /// Build a provider with a per-request timeout baked into the client.
    pub fn new(endpoint: String, dimension: usize, timeout_ms: u64) -> TorgResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| EmbeddingError::RequestFailed {
                reason: format!("failed to build http client: {e}"),
            })?;

        Ok(Self {
            client,
            endpoint,
            dimension,
            timeout_ms,
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> EmbeddingError {
        if e.is_timeout() {
            EmbeddingError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            EmbeddingError::RequestFailed {
                reason: e.to_string(),
            }
        }
    }

    fn request(&self, texts: &[String]) -> TorgResult<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest { texts })
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmbeddingError::RequestFailed {
                reason: format!("endpoint answered {status}"),
            }
            .into());
        }

        let body: EmbedResponse = response.json().map_err(|e| self.transport_error(e))?;
        if body.embeddings.is_empty() {
            return Err(EmbeddingError::EmptyResponse.into());
        }
        if body.embeddings.len() != texts.len() {
            return Err(EmbeddingError::RequestFailed {
                reason: format!(
                    "endpoint returned {} embeddings for {} texts",
                    body.embeddings.len(),
                    texts.len()
                ),
            }
            .into());
        }
        for embedding in &body.embeddings {
            if embedding.len() != self.dimension {
                return Err(EmbeddingError::WrongDimension {
                    expected: self.dimension,
                    actual: embedding.len(),
                }
                .into());
            }
        }

        Ok(body.embeddings)
    }
}

impl IEmbedder for HttpProvider {
    fn embed(&self, text: &str) -> TorgResult<Vec<f32>> {
        let mut vectors = self.request(&[text.to_string()])?;
        vectors
            .pop()
            .ok_or_else(|| EmbeddingError::EmptyResponse.into())
    }

    fn embed_batch(&self, texts: &[String]) -> TorgResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request(texts)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_without_contacting_endpoint() {
        let provider =
            HttpProvider::new("http://localhost:9999/embed".to_string(), 384, 1500).unwrap();
        assert_eq!(provider.dimension(), 384);
        assert_eq!(provider.name(), "http");
    }
}
