//! Offline embedding provider based on feature hashing.
//!
//! [`HashingEmbedder`] needs no network access or model weights: every
//! lowercase alphanumeric token is hashed into one of `dimensions` buckets
//! and the resulting term-frequency vector is L2-normalised. Texts that share
//! vocabulary therefore land close together under cosine similarity.

use async_trait::async_trait;

use crate::embedding::{EmbeddingProvider, l2_normalize};
use crate::error::{RagError, Result};

/// Default number of hash buckets.
pub const DEFAULT_HASHING_DIMENSIONS: usize = 256;

/// Deterministic bag-of-words embedder.
///
/// # Example
///
/// ```rust,ignore
/// use ragsearch_rag::{EmbeddingProvider, HashingEmbedder};
///
/// let embedder = HashingEmbedder::new(256)?;
/// let vector = embedder.embed("Paris is the capital of France.").await?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dimensions: DEFAULT_HASHING_DIMENSIONS }
    }
}

impl HashingEmbedder {
    /// Create an embedder producing vectors of the given dimensionality.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Validation`] if `dimensions` is zero.
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(RagError::Validation("embedding dimensions must be non-zero".into()));
        }
        Ok(Self { dimensions })
    }

    /// Embed synchronously. Infallible once constructed.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for token in tokens(text) {
            let bucket = (fnv1a(token.as_bytes()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }

        l2_normalize(&mut vector);
        vector
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

/// 64-bit FNV-1a, stable across platforms and releases.
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(HashingEmbedder::new(0).is_err());
    }

    #[test]
    fn embeddings_are_deterministic_and_normalised() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed_text("The Eiffel Tower is in Paris.");
        let b = embedder.embed_text("The Eiffel Tower is in Paris.");
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_HASHING_DIMENSIONS);
        assert!((dot(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn tokenisation_ignores_case_and_punctuation() {
        let embedder = HashingEmbedder::default();
        assert_eq!(embedder.embed_text("Paris, FRANCE!"), embedder.embed_text("paris france"));
    }

    #[test]
    fn shared_vocabulary_scores_higher() {
        let embedder = HashingEmbedder::default();
        let query = embedder.embed_text("What is the capital of France?");
        let related = embedder.embed_text("Paris is the capital of France.");
        let unrelated = embedder.embed_text("Rust ownership prevents data races.");
        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new(8).unwrap();
        assert_eq!(embedder.embed_text("  ...  "), vec![0.0; 8]);
    }
}
