//! Loaded documents, their chunks, and scored index hits.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key holding the source (URL or path) a document was loaded from.
pub const SOURCE_KEY: &str = "source";
/// Metadata key holding the MIME type reported or inferred by the loader.
pub const CONTENT_TYPE_KEY: &str = "content_type";
/// Metadata key holding a chunk's position within its document.
pub const CHUNK_INDEX_KEY: &str = "chunk_index";

/// Text read from one source, before chunking.
///
/// Documents are produced by a [`DocumentLoader`](crate::loader::DocumentLoader),
/// consumed by a [`Chunker`](crate::chunking::Chunker), and dropped once indexed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: String,
    pub text: String,
    /// Loader-provided fields such as [`SOURCE_KEY`] and [`CONTENT_TYPE_KEY`].
    pub metadata: HashMap<String, String>,
    /// Path or URL the text came from; `None` for documents built in memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
}

impl Document {
    /// Create a document with no metadata.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: HashMap::new(), source_uri: None }
    }

    /// Create a document loaded from `source`, recording it in the metadata.
    pub fn from_source(
        id: impl Into<String>,
        text: impl Into<String>,
        source: impl Into<String>,
        content_type: &str,
    ) -> Self {
        let source = source.into();
        let metadata = HashMap::from([
            (SOURCE_KEY.to_string(), source.clone()),
            (CONTENT_TYPE_KEY.to_string(), content_type.to_string()),
        ]);
        Self { id: id.into(), text: text.into(), metadata, source_uri: Some(source) }
    }
}

/// A bounded-length segment of a [`Document`], the unit of indexing and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// `{document_id}_{chunk_index}`.
    pub id: String,
    pub text: String,
    /// The parent's metadata plus [`CHUNK_INDEX_KEY`].
    pub metadata: HashMap<String, String>,
    pub document_id: String,
}

impl Chunk {
    /// The source the parent document was loaded from, if recorded.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }
}

/// A chunk paired with its embedding vector, owned by a similarity index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexedEntry {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// One hit from [`SimilarityIndex::search`](crate::index::SimilarityIndex::search).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    /// Cosine similarity to the query; hits are sorted by it, highest first.
    pub score: f32,
}
