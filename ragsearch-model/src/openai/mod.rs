//! OpenAI chat-completions client.
//!
//! Works against the OpenAI API and any OpenAI-compatible server
//! (Ollama, vLLM, LM Studio) via [`OpenAIConfig::compatible`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ragsearch_model::openai::{OpenAIChatModel, OpenAIConfig};
//!
//! let model = OpenAIChatModel::new(OpenAIConfig::new(
//!     std::env::var("OPENAI_API_KEY")?,
//!     "gpt-4o",
//! ))?;
//! let text = model.complete("Say hello").await?;
//! ```

mod client;
mod config;

pub use client::OpenAIChatModel;
pub use config::{OPENAI_API_BASE, OpenAIConfig};
