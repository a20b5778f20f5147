//! Grounded answer generation.

use std::sync::Arc;

use ragsearch_model::{LanguageModel, Result};
use ragsearch_rag::Chunk;

/// Returned without calling the model when retrieval found nothing.
pub const FALLBACK_ANSWER: &str = "I don't have information about this in the documents.";

/// The exact reply the model is told to give when the context lacks the answer.
pub const REFUSAL_PHRASE: &str = "I don't have this information in the documents.";

/// Builds a context-restricted prompt and asks the language model once.
#[derive(Clone)]
pub struct AnswerGenerator {
    model: Arc<dyn LanguageModel>,
}

impl AnswerGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// The underlying model.
    pub fn model(&self) -> &Arc<dyn LanguageModel> {
        &self.model
    }

    /// Answer `question` from `retrieved` only.
    ///
    /// With no retrieved chunks this returns [`FALLBACK_ANSWER`] and makes no
    /// model call. Otherwise the model is called exactly once and its text is
    /// returned unchanged.
    pub async fn generate(&self, question: &str, retrieved: &[Chunk]) -> Result<String> {
        if retrieved.is_empty() {
            tracing::debug!("no retrieved context, returning fallback answer");
            return Ok(FALLBACK_ANSWER.to_string());
        }

        let prompt = build_prompt(question, retrieved);
        tracing::debug!(
            model = self.model.name(),
            context_chunks = retrieved.len(),
            prompt_chars = prompt.chars().count(),
            "calling language model"
        );
        self.model.complete(&prompt).await
    }
}

impl std::fmt::Debug for AnswerGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerGenerator").field("model", &self.model.name()).finish()
    }
}

/// Render the grounded prompt: instructions, then the chunks joined by
/// newlines in retrieval order, then the question.
pub fn build_prompt(question: &str, retrieved: &[Chunk]) -> String {
    let context = retrieved.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join("\n");
    format!(
        "Answer the question ONLY based on the context provided below.\n\
         If the answer cannot be found in the context, respond with exactly: \"{REFUSAL_PHRASE}\"\n\
         \n\
         Do NOT use any general knowledge or information outside the provided context.\n\
         \n\
         Context:\n{context}\n\nQuestion: {question}"
    )
}

#[cfg(test)]
mod tests {
    use ragsearch_model::{ModelError, ScriptedModel};
    use ragsearch_rag::{Chunker, Document, RecursiveChunker};

    use super::*;

    fn chunks(texts: &[&str]) -> Vec<Chunk> {
        let chunker = RecursiveChunker::new(200, 0).unwrap();
        texts
            .iter()
            .enumerate()
            .flat_map(|(i, text)| chunker.chunk(&Document::new(format!("d{i}"), *text)))
            .collect()
    }

    #[tokio::test]
    async fn empty_context_skips_the_model() {
        let model = Arc::new(ScriptedModel::new("should not be used"));
        let generator = AnswerGenerator::new(model.clone());

        let answer = generator.generate("Who won the 1998 World Cup?", &[]).await.unwrap();

        assert_eq!(answer, FALLBACK_ANSWER);
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn calls_the_model_once_with_context_and_question() {
        let model = Arc::new(ScriptedModel::new("Paris."));
        let generator = AnswerGenerator::new(model.clone());
        let context = chunks(&["Paris is the capital of France."]);

        let answer = generator.generate("What is the capital of France?", &context).await.unwrap();

        assert_eq!(answer, "Paris.");
        assert_eq!(model.call_count(), 1);
        let prompt = model.last_prompt().unwrap();
        assert!(prompt.contains("Paris is the capital of France."));
        assert!(prompt.contains("Question: What is the capital of France?"));
        assert!(prompt.contains(REFUSAL_PHRASE));
    }

    #[tokio::test]
    async fn model_errors_propagate() {
        let model = Arc::new(ScriptedModel::failing_once("unused"));
        let generator = AnswerGenerator::new(model);
        let result = generator.generate("q", &chunks(&["text"])).await;
        assert!(matches!(result, Err(ModelError::Quota { .. })));
    }

    #[test]
    fn prompt_joins_context_in_order() {
        let prompt = build_prompt("q?", &chunks(&["first", "second"]));
        assert!(prompt.contains("Context:\nfirst\nsecond\n\nQuestion: q?"));
        assert!(prompt.starts_with("Answer the question ONLY based on the context"));
        assert!(prompt.contains("Do NOT use any general knowledge"));
    }
}
