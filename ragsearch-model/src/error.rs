//! Error types for language model calls.

use thiserror::Error;

/// Errors raised while talking to a language model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The request never produced an HTTP response (DNS, TLS, connection, timeout).
    #[error("Model transport error ({provider}): {message}")]
    Transport {
        /// The provider that was being called.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The provider rejected the request because of rate limits or exhausted quota.
    #[error("Model quota exceeded ({provider}): {message}")]
    Quota {
        /// The provider that rejected the request.
        provider: String,
        /// The provider's explanation.
        message: String,
    },

    /// The provider answered with a non-success status.
    #[error("Model API error ({provider}, status {status}): {message}")]
    Api {
        /// The provider that returned the error.
        provider: String,
        /// HTTP status code.
        status: u16,
        /// The provider's explanation.
        message: String,
    },

    /// The response could not be decoded.
    #[error("Invalid model response ({provider}): {message}")]
    InvalidResponse {
        /// The provider that returned the response.
        provider: String,
        /// What was wrong with it.
        message: String,
    },

    /// The response decoded but contained no text.
    #[error("Model returned an empty response ({provider})")]
    EmptyResponse {
        /// The provider that returned the response.
        provider: String,
    },

    /// Invalid client configuration (missing API key, malformed model spec).
    #[error("Model configuration error: {0}")]
    Config(String),

    /// The model spec names a provider this build cannot talk to.
    #[error("Unsupported model provider '{0}'")]
    UnsupportedProvider(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
