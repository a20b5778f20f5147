//! Conversation state carried through the graph.

use ragsearch_rag::Chunk;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};

/// How far a [`RagState`] has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Only the question is set.
    Start,
    /// Retrieval has run; `retrieved` holds its result (possibly empty).
    Retrieved,
    /// Generation has run; terminal.
    Answered,
}

/// The per-question record: question, retrieved passages and answer.
///
/// Values are immutable: each transition consumes the state and returns a
/// new one that carries the earlier fields forward and sets only its own.
/// `retrieved` stays empty until the retrieve stage runs and `answer` stays
/// empty until the generate stage runs.
///
/// Only serializable: every value is built through [`RagState::new`] and the
/// stage transitions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RagState {
    question: String,
    retrieved: Vec<Chunk>,
    answer: String,
    stage: Stage,
}

impl RagState {
    /// Start a new state for `question`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Validation`] if the question is empty or whitespace.
    pub fn new(question: impl Into<String>) -> Result<Self> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(GraphError::Validation("question must not be empty".to_string()));
        }
        Ok(Self { question, retrieved: Vec::new(), answer: String::new(), stage: Stage::Start })
    }

    /// The user's question.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Retrieved chunks, in retrieval order.
    pub fn retrieved(&self) -> &[Chunk] {
        &self.retrieved
    }

    /// The generated answer; empty before generation.
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// `start → retrieved`: record the retrieval result.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidTransition`] unless the state is at [`Stage::Start`].
    pub fn with_retrieved(self, retrieved: Vec<Chunk>) -> Result<Self> {
        if self.stage != Stage::Start {
            return Err(GraphError::InvalidTransition(format!(
                "cannot record retrieval in stage {:?}",
                self.stage
            )));
        }
        Ok(Self { retrieved, stage: Stage::Retrieved, ..self })
    }

    /// `retrieved → answered`: record the generated answer.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidTransition`] unless the state is at [`Stage::Retrieved`].
    pub fn with_answer(self, answer: impl Into<String>) -> Result<Self> {
        if self.stage != Stage::Retrieved {
            return Err(GraphError::InvalidTransition(format!(
                "cannot record an answer in stage {:?}",
                self.stage
            )));
        }
        Ok(Self { answer: answer.into(), stage: Stage::Answered, ..self })
    }

    /// Split into `(question, retrieved, answer)`.
    pub fn into_parts(self) -> (String, Vec<Chunk>, String) {
        (self.question, self.retrieved, self.answer)
    }
}
