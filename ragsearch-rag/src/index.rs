//! Similarity index trait for storing and searching embedded chunks.

use async_trait::async_trait;

use crate::document::{IndexedEntry, SearchResult};
use crate::error::Result;

/// A storage backend for embedded chunks with similarity search.
///
/// The index is populated in bulk: [`insert_all`](SimilarityIndex::insert_all)
/// appends entries in order, [`clear`](SimilarityIndex::clear) drops them all.
/// There is no per-entry update or delete.
///
/// # Example
///
/// ```rust,ignore
/// use ragsearch_rag::{InMemorySimilarityIndex, SimilarityIndex};
///
/// let index = InMemorySimilarityIndex::new();
/// index.insert_all(entries).await?;
/// let results = index.search(&query_embedding, 4).await?;
/// ```
#[async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Insert entries in one bulk operation, after any existing entries.
    async fn insert_all(&self, entries: Vec<IndexedEntry>) -> Result<()>;

    /// Remove every entry.
    async fn clear(&self) -> Result<()>;

    /// Search for the `top_k` entries most similar to the given embedding.
    ///
    /// Returns results ordered by descending similarity score; ties keep
    /// insertion order.
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>>;

    /// Number of stored entries.
    async fn len(&self) -> usize;

    /// Whether the index holds no entries.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
