//! Error types for graph construction and execution.

use ragsearch_model::ModelError;
use ragsearch_rag::RagError;
use thiserror::Error;

/// Errors raised while building or running a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Invalid input state, e.g. an empty question.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The retrieve stage failed.
    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] RagError),

    /// The language model call failed.
    #[error("Generation failed: {0}")]
    Model(#[from] ModelError),

    /// The graph topology is not a single path from the entry point to the end.
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// A node was handed a state in the wrong stage.
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),
}

/// A convenience result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
