//! The language model capability.

use async_trait::async_trait;

use crate::error::Result;

/// Anything that can turn a prompt into a completion.
///
/// The orchestration graph only ever needs this one call, so clients for
/// any provider (and test doubles) plug in behind it.
///
/// # Example
///
/// ```rust,ignore
/// use ragsearch_model::LanguageModel;
///
/// let answer = model.complete("Answer only from the context ...").await?;
/// ```
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier, used in logs.
    fn name(&self) -> &str;

    /// Send `prompt` as a single user message and return the model's text verbatim.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
