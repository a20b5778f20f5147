//! The retrieve → generate graph, compiled once on first use.

use std::sync::Arc;

use ragsearch_model::LanguageModel;
use ragsearch_rag::Retriever;
use tokio::sync::OnceCell;

use crate::error::Result;
use crate::generator::AnswerGenerator;
use crate::graph::{CompiledGraph, END, START, StateGraph};
use crate::nodes::{GENERATE_NODE, GenerateNode, RETRIEVE_NODE, RetrieveNode};
use crate::state::RagState;

/// Question answering over a retriever and a language model.
///
/// The two-node graph is compiled lazily on the first [`run`](Self::run) and
/// reused afterwards; concurrent first calls compile it once.
pub struct RagGraph {
    retriever: Arc<dyn Retriever>,
    model: Arc<dyn LanguageModel>,
    top_k: usize,
    compiled: OnceCell<CompiledGraph<RagState>>,
}

impl RagGraph {
    pub fn new(retriever: Arc<dyn Retriever>, model: Arc<dyn LanguageModel>, top_k: usize) -> Self {
        Self { retriever, model, top_k, compiled: OnceCell::new() }
    }

    /// Number of chunks requested from the retriever per question.
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// The compiled graph, building it on first access.
    pub async fn graph(&self) -> Result<&CompiledGraph<RagState>> {
        self.compiled
            .get_or_try_init(|| async {
                tracing::debug!("compiling retrieve-generate graph");
                StateGraph::new()
                    .add_node(RetrieveNode::new(Arc::clone(&self.retriever), self.top_k))
                    .add_node(GenerateNode::new(AnswerGenerator::new(Arc::clone(&self.model))))
                    .add_edge(START, RETRIEVE_NODE)
                    .add_edge(RETRIEVE_NODE, GENERATE_NODE)
                    .add_edge(GENERATE_NODE, END)
                    .compile()
            })
            .await
    }

    /// Answer one question, returning the final state.
    ///
    /// # Errors
    ///
    /// Fails on an empty question, a retrieval error, or a model error. No
    /// state is shared between calls, so a failure never affects later questions.
    pub async fn run(&self, question: &str) -> Result<RagState> {
        let state = RagState::new(question)?;
        self.graph().await?.invoke(state).await
    }
}
