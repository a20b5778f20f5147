//! The two stages of the question-answering graph.

use std::sync::Arc;

use async_trait::async_trait;
use ragsearch_rag::Retriever;

use crate::error::Result;
use crate::generator::AnswerGenerator;
use crate::node::Node;
use crate::state::RagState;

/// Name of the retrieve stage.
pub const RETRIEVE_NODE: &str = "retriever";
/// Name of the generate stage.
pub const GENERATE_NODE: &str = "responder";

/// Fetches the top-k chunks for the question.
pub struct RetrieveNode {
    retriever: Arc<dyn Retriever>,
    top_k: usize,
}

impl RetrieveNode {
    pub fn new(retriever: Arc<dyn Retriever>, top_k: usize) -> Self {
        Self { retriever, top_k }
    }
}

#[async_trait]
impl Node<RagState> for RetrieveNode {
    fn name(&self) -> &str {
        RETRIEVE_NODE
    }

    async fn run(&self, state: RagState) -> Result<RagState> {
        let retrieved = self.retriever.retrieve(state.question(), self.top_k).await?;
        tracing::info!(retrieved = retrieved.len(), top_k = self.top_k, "retrieved context");
        state.with_retrieved(retrieved)
    }
}

/// Produces the answer from the retrieved chunks.
pub struct GenerateNode {
    generator: AnswerGenerator,
}

impl GenerateNode {
    pub fn new(generator: AnswerGenerator) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Node<RagState> for GenerateNode {
    fn name(&self) -> &str {
        GENERATE_NODE
    }

    async fn run(&self, state: RagState) -> Result<RagState> {
        let answer = self.generator.generate(state.question(), state.retrieved()).await?;
        state.with_answer(answer)
    }
}
