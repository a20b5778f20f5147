//! Text → vector.

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into fixed-length vectors for similarity search.
///
/// The same text must map to the same vector for a given model, and every
/// vector has [`dimensions`](Self::dimensions) components. Queries and
/// chunks must be embedded by the same provider.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Short provider name used in logs and errors.
    fn name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, preserving order.
    ///
    /// Defaults to one [`embed`](Self::embed) call per text.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize;
}

/// Scale `vector` to unit length in place. The zero vector is left as is.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
}
