//! Brute-force cosine search over a `Vec` behind a `tokio::sync::RwLock`.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{IndexedEntry, SearchResult};
use crate::error::{RagError, Result};
use crate::index::SimilarityIndex;

/// An in-memory index using cosine similarity for search.
///
/// Entries are kept in insertion order so that equal scores are returned
/// in the order the chunks were indexed.
#[derive(Debug, Default)]
pub struct InMemorySimilarityIndex {
    entries: RwLock<Vec<IndexedEntry>>,
}

impl InMemorySimilarityIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Cosine of the angle between `a` and `b`; 0.0 when either is the zero vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (dot, sq_a, sq_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, sq_a, sq_b), (x, y)| (dot + x * y, sq_a + x * x, sq_b + y * y));
    let magnitude = (sq_a * sq_b).sqrt();
    if magnitude == 0.0 { 0.0 } else { dot / magnitude }
}

#[async_trait]
impl SimilarityIndex for InMemorySimilarityIndex {
    async fn insert_all(&self, entries: Vec<IndexedEntry>) -> Result<()> {
        let mut stored = self.entries.write().await;
        if let Some(expected) = stored.first().or(entries.first()).map(|e| e.embedding.len()) {
            if let Some(bad) = entries.iter().find(|e| e.embedding.len() != expected) {
                return Err(RagError::Index {
                    backend: "InMemory".to_string(),
                    message: format!(
                        "chunk '{}' has {} dimensions, index holds {expected}",
                        bad.chunk.id,
                        bad.embedding.len()
                    ),
                });
            }
        }
        stored.extend(entries);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let entries = self.entries.read().await;

        let mut scored: Vec<SearchResult> = entries
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(&entry.embedding, embedding),
            })
            .collect();

        // Stable sort: equal scores stay in insertion order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
