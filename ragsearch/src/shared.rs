//! Process-wide pipeline with explicit, race-free initialization.

use std::future::Future;

use tokio::sync::OnceCell;

use crate::error::{PipelineError, Result};
use crate::options::PipelineOptions;
use crate::pipeline::{Pipeline, initialize};
use crate::response::AskResponse;

static GLOBAL: SharedPipeline = SharedPipeline::new();

/// The process-wide pipeline slot.
pub fn global() -> &'static SharedPipeline {
    &GLOBAL
}

/// A pipeline slot that is built at most once.
///
/// Concurrent first callers of [`get_or_initialize`](Self::get_or_initialize)
/// wait for a single build. A failed build leaves the slot empty so a later
/// call may retry; until then [`ask`](Self::ask) fails with
/// [`PipelineError::NotInitialized`].
#[derive(Debug, Default)]
pub struct SharedPipeline {
    cell: OnceCell<Pipeline>,
}

impl SharedPipeline {
    pub const fn new() -> Self {
        Self { cell: OnceCell::const_new() }
    }

    /// Whether a pipeline has been built.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// The pipeline, if built.
    pub fn get(&self) -> Option<&Pipeline> {
        self.cell.get()
    }

    /// Return the pipeline, running `init` if none has been built yet.
    pub async fn get_or_initialize<F, Fut>(&self, init: F) -> Result<&Pipeline>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Pipeline>>,
    {
        self.cell.get_or_try_init(init).await
    }

    /// Build from `options` with the production collaborators, once.
    pub async fn initialize(&self, options: &PipelineOptions) -> Result<&Pipeline> {
        self.get_or_initialize(|| initialize(options)).await
    }

    /// Answer a question with the built pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NotInitialized`] before a successful build.
    pub async fn ask(&self, question: &str) -> Result<AskResponse> {
        self.get().ok_or(PipelineError::NotInitialized)?.ask(question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_slot_is_not_initialized() {
        let shared = SharedPipeline::new();
        assert!(!shared.is_initialized());
        assert!(shared.get().is_none());
        assert!(matches!(shared.ask("q").await, Err(PipelineError::NotInitialized)));
    }

    #[tokio::test]
    async fn failed_build_leaves_slot_empty() {
        let shared = SharedPipeline::new();
        let result = shared
            .get_or_initialize(|| async { Err(PipelineError::initialization_msg("boom")) })
            .await;
        assert!(matches!(result, Err(PipelineError::Initialization { .. })));
        assert!(!shared.is_initialized());
    }
}
