//! Pipeline options and their TOML representation.

use std::path::Path;

use ragsearch_rag::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_TOP_K, RagConfig, Source,
};
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Chat model used when none is configured.
pub const DEFAULT_LLM_MODEL: &str = "openai:gpt-4o";
/// Embedding model used when none is configured.
pub const DEFAULT_EMBEDDING_MODEL: &str = "openai:text-embedding-3-small";
/// Selects the offline [`HashingEmbedder`](ragsearch_rag::HashingEmbedder).
pub const HASHING_EMBEDDING: &str = "hashing";
/// Sources indexed when none are configured.
pub const DEFAULT_SOURCES: &[&str] = &[
    "https://github.com/jainendrakr26/python-numpy/blob/main/ml.txt",
    "https://github.com/jainendrakr26/python-numpy/blob/main/dl.txt",
];

/// Everything [`initialize`](crate::initialize) needs to know.
///
/// Every field has a default, so a TOML file only lists what it changes:
///
/// ```toml
/// sources = ["docs/", "https://example.com/faq.html"]
/// chunk_size = 800
/// llm_model = "openai:gpt-4o-mini"
/// embedding_model = "hashing"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineOptions {
    /// URLs, files and directories to index, in order.
    pub sources: Vec<Source>,
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared by consecutive chunks.
    pub chunk_overlap: usize,
    /// Chunks retrieved per question.
    pub top_k: usize,
    /// `provider:model` for answer generation.
    pub llm_model: String,
    /// `provider:model` for embeddings, or `hashing`.
    pub embedding_model: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|s| Source::parse(s)).collect(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }
}

impl PipelineOptions {
    /// Default options over the given sources.
    pub fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { sources: sources.into_iter().map(|s| Source::parse(s.as_ref())).collect(), ..Self::default() }
    }

    pub fn with_chunking(mut self, chunk_size: usize, chunk_overlap: usize) -> Self {
        self.chunk_size = chunk_size;
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_llm_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = model.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Parse options from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Read options from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// The retrieval settings, validated.
    pub fn rag_config(&self) -> ragsearch_rag::Result<RagConfig> {
        RagConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .top_k(self.top_k)
            .build()
    }

    /// Check chunking and retrieval settings without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Validation`] unless
    /// `chunk_size > chunk_overlap` and `top_k > 0`.
    pub fn validate(&self) -> Result<()> {
        self.rag_config().map(|_| ()).map_err(|e| PipelineError::Validation(e.to_string()))
    }
}
