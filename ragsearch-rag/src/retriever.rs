//! Vector index adapter: embed chunks in bulk, retrieve top-k by query.
//!
//! [`VectorIndex`] composes an [`EmbeddingProvider`] and a [`SimilarityIndex`].
//! It must be [built](VectorIndex::build) before it can serve queries; a
//! rebuild replaces the index contents wholesale.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::document::{Chunk, IndexedEntry, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::SimilarityIndex;

/// Capability to fetch the chunks most relevant to a query.
///
/// This is the seam the orchestration graph depends on; tests substitute
/// their own implementations.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return at most `k` chunks ordered by descending relevance.
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Chunk>>;
}

/// Wraps an embedding provider and a similarity index behind
/// "build" and "retrieve" operations.
///
/// `build` takes `&mut self`, so concurrent builds are ruled out by the
/// borrow checker; once built, the adapter is shared read-only (usually
/// behind an `Arc`).
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use ragsearch_rag::{HashingEmbedder, InMemorySimilarityIndex, VectorIndex};
///
/// let mut index = VectorIndex::new(
///     Arc::new(HashingEmbedder::default()),
///     Arc::new(InMemorySimilarityIndex::new()),
/// );
/// index.build(&chunks).await?;
/// let top = index.retrieve("capital of France", 4).await?;
/// ```
pub struct VectorIndex {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn SimilarityIndex>,
    ready: bool,
    entry_count: usize,
}

impl VectorIndex {
    /// Create an adapter over the given collaborators. It is not ready until built.
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn SimilarityIndex>,
    ) -> Self {
        Self { embedding_provider, index, ready: false, entry_count: 0 }
    }

    /// Whether [`build`](Self::build) has completed successfully.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Number of chunks indexed by the last successful build.
    pub fn len(&self) -> usize {
        self.entry_count
    }

    /// Whether the last successful build indexed no chunks.
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Embed every chunk and load the index in one bulk operation.
    ///
    /// Any previous contents are discarded. If the build fails the adapter
    /// is left not ready.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] or [`RagError::Index`] when a
    /// collaborator fails.
    pub async fn build(&mut self, chunks: &[Chunk]) -> Result<()> {
        self.ready = false;
        self.entry_count = 0;

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(chunk_count = chunks.len(), error = %e, "embedding failed during index build");
            e
        })?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::Embedding {
                provider: self.embedding_provider.name().to_string(),
                message: format!(
                    "expected {} embeddings, received {}",
                    chunks.len(),
                    embeddings.len()
                ),
            });
        }

        let entries: Vec<IndexedEntry> = chunks
            .iter()
            .cloned()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedEntry { chunk, embedding })
            .collect();

        self.index.clear().await?;
        self.index.insert_all(entries).await.map_err(|e| {
            error!(chunk_count = chunks.len(), error = %e, "bulk insert failed during index build");
            e
        })?;

        self.entry_count = chunks.len();
        self.ready = true;
        info!(chunk_count = self.entry_count, "vector index built");
        Ok(())
    }

    /// Retrieve the top `k` chunks together with their similarity scores.
    ///
    /// No score threshold is applied: all top-`k` results are returned.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::NotReady`] before a successful build and
    /// [`RagError::Validation`] if `k` is zero.
    pub async fn retrieve_with_scores(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        if !self.ready {
            return Err(RagError::NotReady);
        }
        if k == 0 {
            return Err(RagError::Validation("k must be greater than zero".to_string()));
        }

        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during retrieval");
            e
        })?;

        let results = self.index.search(&query_embedding, k).await.map_err(|e| {
            error!(error = %e, "similarity search failed");
            e
        })?;

        for (rank, result) in results.iter().enumerate() {
            debug!(rank, chunk.id = %result.chunk.id, score = result.score, "retrieved chunk");
        }
        info!(result_count = results.len(), k, "retrieval completed");

        Ok(results)
    }
}

#[async_trait]
impl Retriever for VectorIndex {
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        let results = self.retrieve_with_scores(query, k).await?;
        Ok(results.into_iter().map(|r| r.chunk).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::{Chunker, RecursiveChunker};
    use crate::document::Document;
    use crate::hashing::HashingEmbedder;
    use crate::inmemory::InMemorySimilarityIndex;

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        fn name(&self) -> &str {
            "failing"
        }

        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(RagError::Embedding { provider: "test".into(), message: "offline".into() })
        }

        fn dimensions(&self) -> usize {
            4
        }
    }

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        let documents: Vec<Document> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Document::new(format!("doc{i}"), *text))
            .collect();
        RecursiveChunker::new(500, 50).unwrap().split(&documents)
    }

    fn adapter() -> VectorIndex {
        VectorIndex::new(
            Arc::new(HashingEmbedder::default()),
            Arc::new(InMemorySimilarityIndex::new()),
        )
    }

    #[tokio::test]
    async fn retrieve_before_build_is_not_ready() {
        let index = adapter();
        assert!(!index.is_ready());
        let err = index.retrieve("anything", 4).await.unwrap_err();
        assert!(matches!(err, RagError::NotReady));
    }

    #[tokio::test]
    async fn retrieve_returns_most_similar_first() {
        let mut index = adapter();
        index
            .build(&chunks(&[
                "The Eiffel Tower is in Paris.",
                "Paris is the capital of France.",
                "Rust has no garbage collector.",
            ]))
            .await
            .unwrap();

        let results = index.retrieve_with_scores("What is the capital of France?", 4).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].chunk.text, "Paris is the capital of France.");
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn retrieve_is_bounded_by_k() {
        let mut index = adapter();
        index.build(&chunks(&["a b", "b c", "c d", "d e", "e f", "f g"])).await.unwrap();
        assert_eq!(index.len(), 6);
        assert_eq!(index.retrieve("b", 4).await.unwrap().len(), 4);
        assert!(matches!(index.retrieve("b", 0).await, Err(RagError::Validation(_))));
    }

    #[tokio::test]
    async fn rebuild_replaces_contents() {
        let mut index = adapter();
        index.build(&chunks(&["old content here"])).await.unwrap();
        index.build(&chunks(&["new content there"])).await.unwrap();
        let results = index.retrieve("content", 4).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "new content there");
    }

    #[tokio::test]
    async fn failed_build_leaves_adapter_not_ready() {
        let mut index = VectorIndex::new(
            Arc::new(FailingEmbedder),
            Arc::new(InMemorySimilarityIndex::new()),
        );
        assert!(index.build(&chunks(&["text"])).await.is_err());
        assert!(!index.is_ready());
        assert!(matches!(index.retrieve("text", 1).await, Err(RagError::NotReady)));
    }
}
