//! # ragsearch
//!
//! Retrieval-augmented question answering over your own documents.
//!
//! Sources (URLs, files, directories) are loaded, split into overlapping
//! chunks, embedded and indexed once. Each question then runs a two-stage
//! graph: retrieve the most similar chunks, and ask a language model to
//! answer from those chunks alone.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ragsearch::{PipelineOptions, initialize};
//!
//! let options = PipelineOptions::new(["docs/"]).with_chunking(500, 50);
//! let pipeline = initialize(&options).await?;
//! let response = pipeline.ask("What is machine learning?").await?;
//! println!("{}", response.answer);
//! ```
//!
//! A long-running process can keep one pipeline in [`global()`] and build
//! it on first use with [`SharedPipeline::initialize`].
//!
//! ## Crates
//!
//! - [`rag`]: loaders, chunking, embeddings and the vector index
//! - [`model`]: language model clients
//! - [`graph`]: conversation state and the retrieve → generate graph

pub mod error;
pub mod options;
pub mod pipeline;
pub mod response;
pub mod shared;

pub use ragsearch_graph as graph;
pub use ragsearch_model as model;
pub use ragsearch_rag as rag;

pub use error::{PipelineError, Result};
pub use options::{
    DEFAULT_EMBEDDING_MODEL, DEFAULT_LLM_MODEL, DEFAULT_SOURCES, HASHING_EMBEDDING,
    PipelineOptions,
};
pub use pipeline::{OPENAI_BASE_URL_ENV, Pipeline, PipelineComponents, initialize, initialize_with};
pub use response::{AskResponse, PREVIEW_CHARS, RetrievedPassage, preview};
pub use shared::{SharedPipeline, global};
