//! Error types for building and querying a pipeline.

use std::error::Error as StdError;

use ragsearch_graph::GraphError;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Errors surfaced by [`initialize`](crate::initialize) and [`Pipeline::ask`](crate::Pipeline::ask).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Building the pipeline failed; `source` is the collaborator failure.
    #[error("Initialization failed: {message}")]
    Initialization {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Invalid input, such as an empty question or inconsistent options.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Options could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `ask` was called on a shared pipeline that has not been built.
    #[error("Pipeline is not initialized")]
    NotInitialized,

    /// A question failed during retrieval or generation.
    #[error(transparent)]
    Ask(GraphError),
}

impl PipelineError {
    pub(crate) fn initialization(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Initialization { message: message.into(), source: Some(source.into()) }
    }

    pub(crate) fn initialization_msg(message: impl Into<String>) -> Self {
        Self::Initialization { message: message.into(), source: None }
    }
}

impl From<GraphError> for PipelineError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Validation(message) => Self::Validation(message),
            other => Self::Ask(other),
        }
    }
}

/// A convenience result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
