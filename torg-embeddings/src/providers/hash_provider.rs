//! Deterministic hashed bag-of-words provider.
//!
//! Folds each term into a handful of blake3-derived buckets with signed
//! weights, then L2-normalizes. No model files, no network: the same text
//! always produces the same vector, and texts sharing terms land close to
//! each other. Semantically far weaker than a neural model, but it keeps
//! vector search exercising the full pipeline in tests and offline setups.

use std::collections::HashMap;

use torg_core::traits::IEmbedder;
use torg_core::TorgResult;

/// Buckets each term contributes to. More buckets smooth out hash
/// collisions at the cost of a denser vector.
const BUCKETS_PER_TERM: usize = 16;

/// Deterministic local embedding provider.
pub struct HashProvider {
    dimension: usize,
}

impl HashProvider {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    /// Tokenize text into lowercase alphanumeric terms. Single-character
    /// fragments are dropped as noise.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.chars().count() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    /// Spread one term across the vector using bytes drawn from its
    /// blake3 hash. The low bit of each draw picks the sign.
    fn accumulate_term(vector: &mut [f32], term: &str, weight: f32) {
        let mut reader = blake3::Hasher::new()
            .update(term.as_bytes())
            .finalize_xof();
        let mut buf = [0u8; 8];
        for _ in 0..BUCKETS_PER_TERM {
            reader.fill(&mut buf);
            let raw = u64::from_le_bytes(buf);
            let bucket = (raw >> 1) as usize % vector.len();
            let sign = if raw & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign * weight;
        }
    }

    /// Build the vector for a text. Blank or token-free text maps to the
    /// zero vector, which cosine similarity treats as matching nothing.
    fn hash_vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; self.dimension];
        }

        let mut tf: HashMap<String, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.clone()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vector = vec![0.0f32; self.dimension];
        for (term, count) in &tf {
            let freq = count / total;
            Self::accumulate_term(&mut vector, term, freq);
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

impl IEmbedder for HashProvider {
    fn embed(&self, text: &str) -> TorgResult<Vec<f32>> {
        Ok(self.hash_vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> TorgResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.hash_vector(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashed-bow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    #[test]
    fn same_text_gives_identical_vectors() {
        let provider = HashProvider::new(64);
        let a = provider.embed("barn vinterdress marinblå").unwrap();
        let b = provider.embed("barn vinterdress marinblå").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn vectors_are_unit_length() {
        let provider = HashProvider::new(128);
        let v = provider.embed("professional metal detector").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[test]
    fn blank_text_gives_zero_vector() {
        let provider = HashProvider::new(32);
        let v = provider.embed("   ").unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
        assert_eq!(v.len(), 32);
    }

    #[test]
    fn shared_terms_score_higher_than_disjoint() {
        let provider = HashProvider::new(384);
        let jacket = provider.embed("warm winter jacket").unwrap();
        let coat = provider.embed("warm winter coat").unwrap();
        let soap = provider.embed("lavender hand soap").unwrap();

        let near = cosine_similarity(&jacket, &coat);
        let far = cosine_similarity(&jacket, &soap);
        assert!(near > far);
    }

    #[test]
    fn respects_configured_dimension() {
        let provider = HashProvider::new(384);
        let v = provider.embed("gummistøvler").unwrap();
        assert_eq!(v.len(), 384);
        assert_eq!(provider.dimension(), 384);
    }

    #[test]
    fn batch_preserves_order() {
        let provider = HashProvider::new(16);
        let texts = vec!["first".to_string(), "second".to_string()];
        let batch = provider.embed_batch(&texts).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], provider.embed("first").unwrap());
        assert_eq!(batch[1], provider.embed("second").unwrap());
    }
}
