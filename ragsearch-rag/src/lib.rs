//! # ragsearch-rag
//!
//! The retrieval half of RAG Search: load documents, split them into
//! overlapping chunks, embed them, and retrieve the chunks closest to a query.
//!
//! ## Overview
//!
//! - [`DocumentLoader`] / [`SourceLoader`]: turn URLs, files and directories into [`Document`]s
//! - [`Chunker`] / [`RecursiveChunker`]: split documents into bounded, overlapping [`Chunk`]s
//! - [`EmbeddingProvider`]: text → vector ([`HashingEmbedder`], `OpenAIEmbeddingProvider`)
//! - [`SimilarityIndex`]: bulk insert and top-k search ([`InMemorySimilarityIndex`])
//! - [`VectorIndex`]: the adapter that builds the index once and serves [`Retriever`] queries
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragsearch_rag::*;
//!
//! let documents = SourceLoader::new().load(&Source::parse("data/")).await?;
//! let chunks = RecursiveChunker::new(500, 50)?.split(&documents);
//!
//! let mut index = VectorIndex::new(
//!     Arc::new(HashingEmbedder::default()),
//!     Arc::new(InMemorySimilarityIndex::new()),
//! );
//! index.build(&chunks).await?;
//! let top = index.retrieve("What is machine learning?", 4).await?;
//! ```
//!
//! ## Features
//!
//! - `web` (default): load `http(s)://` sources
//! - `openai`: `OpenAIEmbeddingProvider`
//! - `pdf`: load `.pdf` files

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod hashing;
pub mod index;
pub mod inmemory;
pub mod loader;
pub mod retriever;

#[cfg(feature = "openai")]
pub mod openai;

pub use chunking::{Chunker, DEFAULT_SEPARATORS, RecursiveChunker, split};
pub use config::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_TOP_K, RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, IndexedEntry, SearchResult};
pub use embedding::{EmbeddingProvider, l2_normalize};
pub use error::{RagError, Result};
pub use hashing::HashingEmbedder;
pub use index::SimilarityIndex;
pub use inmemory::InMemorySimilarityIndex;
pub use loader::{DirectoryLoader, DocumentLoader, FileKind, Source, SourceLoader, TextLoader};
pub use retriever::{Retriever, VectorIndex};

#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
#[cfg(feature = "pdf")]
pub use loader::PdfLoader;
#[cfg(feature = "web")]
pub use loader::WebLoader;
