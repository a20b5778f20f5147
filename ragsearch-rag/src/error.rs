//! Error types for the `ragsearch-rag` crate.

use thiserror::Error;

/// Errors that can occur while loading, indexing or retrieving documents.
#[derive(Debug, Error)]
pub enum RagError {
    /// A source could not be loaded: unreachable URL, missing file, or
    /// unsupported type.
    #[error("Load error ({source_name}): {message}")]
    Load {
        /// URL or path as given by the caller.
        source_name: String,
        message: String,
    },

    /// Retrieval was attempted before the index was built.
    #[error("Vector index is not ready: build() must be called before retrieval")]
    NotReady,

    /// Invalid caller input (chunk sizes, `k`, empty input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The embedding provider failed or returned unusable vectors.
    #[error("Embedding error ({provider}): {message}")]
    Embedding { provider: String, message: String },

    /// The similarity index rejected an insert or search.
    #[error("Index error ({backend}): {message}")]
    Index { backend: String, message: String },
}

impl RagError {
    pub(crate) fn load(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load { source_name: source_name.into(), message: message.into() }
    }
}

/// Result alias used throughout `ragsearch-rag`.
pub type Result<T> = std::result::Result<T, RagError>;
