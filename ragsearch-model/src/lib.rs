//! # ragsearch-model
//!
//! Language model clients for RAG Search.
//!
//! ## Overview
//!
//! - [`LanguageModel`]: the single capability the pipeline needs: `complete(prompt) -> text`
//! - [`OpenAIChatModel`]: OpenAI chat completions and OpenAI-compatible servers
//! - [`ScriptedModel`]: canned responses plus call recording, for tests and demos
//! - [`ModelSpec`] / [`create_model`]: build a client from a `provider:model` string
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ragsearch_model::{create_model, ModelSettings, ModelSpec};
//!
//! let model = create_model(&ModelSpec::parse("openai:gpt-4o")?, &ModelSettings::default())?;
//! let answer = model.complete("Say hello").await?;
//! ```

pub mod error;
pub mod llm;
pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;
pub mod spec;

pub use error::{ModelError, Result};
pub use llm::LanguageModel;
pub use mock::ScriptedModel;
#[cfg(feature = "openai")]
pub use openai::{OpenAIChatModel, OpenAIConfig};
pub use spec::{DEFAULT_PROVIDER, ModelSettings, ModelSpec, create_model};
