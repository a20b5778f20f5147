//! Scripted language model for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::llm::LanguageModel;

/// A [`LanguageModel`] that replays canned responses and records every prompt.
///
/// Once the script is exhausted the default response is returned. Use
/// [`call_count`](Self::call_count) and [`prompts`](Self::prompts) to assert
/// how the model was driven.
///
/// # Example
///
/// ```rust,ignore
/// use ragsearch_model::{LanguageModel, ScriptedModel};
///
/// let model = ScriptedModel::new("Paris.");
/// assert_eq!(model.complete("capital?").await?, "Paris.");
/// assert_eq!(model.call_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedModel {
    default_response: String,
    script: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    /// A model that always answers `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self { default_response: response.into(), ..Self::default() }
    }

    /// Queue responses (or failures) returned before the default, in order.
    pub fn with_script(self, script: impl IntoIterator<Item = Result<String>>) -> Self {
        if let Ok(mut queue) = self.script.lock() {
            queue.extend(script);
        }
        self
    }

    /// A model whose next call fails with a quota error.
    pub fn failing_once(response: impl Into<String>) -> Self {
        Self::new(response).with_script([Err(ModelError::Quota {
            provider: "scripted".into(),
            message: "quota exhausted".into(),
        })])
    }

    /// Number of `complete` calls so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Every prompt received, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// The most recent prompt.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().ok().and_then(|p| p.last().cloned())
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let next = self.script.lock().ok().and_then(|mut queue| queue.pop_front());
        next.unwrap_or_else(|| Ok(self.default_response.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_then_default() {
        let model = ScriptedModel::new("default").with_script([Ok("first".to_string())]);
        assert_eq!(model.complete("a").await.unwrap(), "first");
        assert_eq!(model.complete("b").await.unwrap(), "default");
        assert_eq!(model.prompts(), vec!["a", "b"]);
        assert_eq!(model.last_prompt().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn failing_once_recovers() {
        let model = ScriptedModel::failing_once("ok");
        assert!(matches!(model.complete("x").await, Err(ModelError::Quota { .. })));
        assert_eq!(model.complete("y").await.unwrap(), "ok");
        assert_eq!(model.call_count(), 2);
    }
}
