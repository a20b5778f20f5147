//! Embeddings from the OpenAI API or an OpenAI-compatible server.
//!
//! Only compiled with the `openai` feature.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Default API base.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Model used when none is set.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Most inputs the API accepts in one request.
pub const MAX_INPUTS_PER_REQUEST: usize = 2048;

const PROVIDER: &str = "openai";

/// Native output size of a known embedding model.
fn native_dimensions(model: &str) -> usize {
    match model {
        "text-embedding-3-large" => 3072,
        _ => 1536,
    }
}

/// [`EmbeddingProvider`] for `POST {base}/embeddings`.
///
/// Large batches are split into requests of at most
/// [`MAX_INPUTS_PER_REQUEST`] inputs; results keep input order.
///
/// ```rust,ignore
/// use ragsearch_rag::OpenAIEmbeddingProvider;
///
/// let provider = OpenAIEmbeddingProvider::from_env()?.with_model("text-embedding-3-large");
/// let vectors = provider.embed_batch(&["first chunk", "second chunk"]).await?;
/// ```
#[derive(Clone)]
pub struct OpenAIEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    /// Truncation requested from the API; `None` keeps the native size.
    requested_dimensions: Option<usize>,
}

impl OpenAIEmbeddingProvider {
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(embedding_error("API key must not be empty"));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: endpoint_for(OPENAI_API_BASE),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            requested_dimensions: None,
        })
    }

    /// Read the key from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| embedding_error("OPENAI_API_KEY environment variable not set"))?;
        Self::new(api_key)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Target an OpenAI-compatible server, e.g. `http://localhost:11434/v1`.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.endpoint = endpoint_for(base_url.as_ref());
        self
    }

    /// Ask the API to shorten vectors to `dimensions` components.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.requested_dimensions = Some(dimensions);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let body = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.requested_dimensions,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "embedding request failed");
                embedding_error(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            error!(provider = PROVIDER, %status, "embedding API error");
            return Err(embedding_error(format!("API returned {status}: {detail}")));
        }

        let parsed: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = PROVIDER, error = %e, "unparseable embedding response");
            embedding_error(format!("failed to parse response: {e}"))
        })?;

        if parsed.data.len() != texts.len() {
            return Err(embedding_error(format!(
                "expected {} embeddings, API returned {}",
                texts.len(),
                parsed.data.len()
            )));
        }

        let mut data = parsed.data;
        data.sort_by_key(|item| item.index);
        Ok(data.into_iter().map(|item| item.embedding).collect())
    }
}

fn endpoint_for(base_url: &str) -> String {
    format!("{}/embeddings", base_url.trim_end_matches('/'))
}

fn embedding_error(message: impl Into<String>) -> RagError {
    RagError::Embedding { provider: PROVIDER.to_string(), message: message.into() }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl EmbeddingProvider for OpenAIEmbeddingProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.request(&[text])
            .await?
            .pop()
            .ok_or_else(|| embedding_error("API returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_INPUTS_PER_REQUEST) {
            debug!(provider = PROVIDER, model = %self.model, batch_size = batch.len(), "embedding batch");
            vectors.extend(self.request(batch).await?);
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.requested_dimensions.unwrap_or_else(|| native_dimensions(&self.model))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn provider(server: &MockServer) -> OpenAIEmbeddingProvider {
        OpenAIEmbeddingProvider::new("sk-test").unwrap().with_base_url(format!("{}/v1", server.uri()))
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(OpenAIEmbeddingProvider::new("  ").is_err());
    }

    #[test]
    fn dimensions_follow_model_and_override() {
        let provider = OpenAIEmbeddingProvider::new("k").unwrap();
        assert_eq!(provider.dimensions(), 1536);
        assert_eq!(provider.clone().with_model("text-embedding-3-large").dimensions(), 3072);
        assert_eq!(provider.with_dimensions(256).dimensions(), 256);
    }

    #[tokio::test]
    async fn batch_results_follow_input_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({ "model": "text-embedding-3-small", "input": ["a", "b"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "index": 1, "embedding": [0.0, 1.0] },
                    { "index": 0, "embedding": [1.0, 0.0] }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let vectors = provider(&server).await.embed_batch(&["a", "b"]).await.unwrap();

        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn api_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "Incorrect API key provided" }
            })))
            .mount(&server)
            .await;

        let err = provider(&server).await.embed("a").await.unwrap_err();

        assert!(
            matches!(&err, RagError::Embedding { provider, message } if provider == "openai" && message.contains("Incorrect API key"))
        );
    }

    #[tokio::test]
    async fn short_response_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        let err = provider(&server).await.embed_batch(&["a", "b"]).await.unwrap_err();

        assert!(matches!(err, RagError::Embedding { message, .. } if message.contains("expected 2")));
    }

    #[tokio::test]
    async fn empty_batch_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(500)).expect(0).mount(&server).await;

        assert!(provider(&server).await.embed_batch(&[]).await.unwrap().is_empty());
    }
}
