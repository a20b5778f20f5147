//! Building a pipeline from options and answering questions with it.

use std::sync::Arc;
use std::time::Instant;

use ragsearch_graph::RagGraph;
use ragsearch_model::{LanguageModel, ModelSettings, ModelSpec, create_model};
use ragsearch_rag::{
    Chunker, DocumentLoader, EmbeddingProvider, HashingEmbedder, InMemorySimilarityIndex,
    RecursiveChunker, SimilarityIndex, SourceLoader, VectorIndex,
};
use tracing::{Instrument, error, info};

use crate::error::{PipelineError, Result};
use crate::options::{HASHING_EMBEDDING, PipelineOptions};
use crate::response::{AskResponse, RetrievedPassage};

/// Environment variable overriding the OpenAI API base URL.
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// The collaborators a pipeline is assembled from.
///
/// [`from_options`](Self::from_options) builds the production set; tests
/// swap in doubles with the `with_*` methods.
pub struct PipelineComponents {
    pub loader: Arc<dyn DocumentLoader>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub index: Arc<dyn SimilarityIndex>,
    pub model: Arc<dyn LanguageModel>,
}

impl PipelineComponents {
    /// Default loader and in-memory index around the given embedder and model.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            loader: Arc::new(SourceLoader::new()),
            embedder,
            index: Arc::new(InMemorySimilarityIndex::new()),
            model,
        }
    }

    /// Build the embedder and model named in `options`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Initialization`] for an unknown provider or
    /// missing credentials.
    pub fn from_options(options: &PipelineOptions) -> Result<Self> {
        let base_url = std::env::var(OPENAI_BASE_URL_ENV).ok();
        let embedder = embedder_from_spec(&options.embedding_model, base_url.as_deref())?;

        let spec = ModelSpec::parse(&options.llm_model)
            .map_err(|e| PipelineError::initialization("invalid language model", e))?;
        let settings = ModelSettings { base_url, ..ModelSettings::default() };
        let model = create_model(&spec, &settings)
            .map_err(|e| PipelineError::initialization("cannot create language model", e))?;

        Ok(Self::new(embedder, model))
    }

    pub fn with_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_index(mut self, index: Arc<dyn SimilarityIndex>) -> Self {
        self.index = index;
        self
    }
}

#[cfg_attr(not(feature = "openai"), allow(unused_variables))]
fn embedder_from_spec(spec: &str, base_url: Option<&str>) -> Result<Arc<dyn EmbeddingProvider>> {
    if spec.trim().eq_ignore_ascii_case(HASHING_EMBEDDING) {
        return Ok(Arc::new(HashingEmbedder::default()));
    }

    let spec = ModelSpec::parse(spec)
        .map_err(|e| PipelineError::initialization("invalid embedding model", e))?;
    match spec.provider.as_str() {
        #[cfg(feature = "openai")]
        "openai" => {
            let mut provider = ragsearch_rag::OpenAIEmbeddingProvider::from_env()
                .map_err(|e| PipelineError::initialization("cannot create embedding provider", e))?
                .with_model(&spec.model);
            if let Some(base_url) = base_url {
                provider = provider.with_base_url(base_url);
            }
            Ok(Arc::new(provider))
        }
        other => Err(PipelineError::initialization_msg(format!(
            "unsupported embedding provider '{other}'"
        ))),
    }
}

/// Build a pipeline with the production collaborators named in `options`.
///
/// # Errors
///
/// Returns [`PipelineError::Initialization`] wrapping whichever step failed.
pub async fn initialize(options: &PipelineOptions) -> Result<Pipeline> {
    let components = PipelineComponents::from_options(options)?;
    initialize_with(options, components).await
}

/// Load, chunk, embed and index every source, then compile the graph.
///
/// Nothing is returned unless every step succeeds, so a failed call leaves
/// no partially built index reachable.
///
/// # Errors
///
/// Returns [`PipelineError::Initialization`] when the options are invalid,
/// no sources are configured, any source fails to load, the sources yield no
/// documents or no indexable text, or embedding/indexing fails.
pub async fn initialize_with(
    options: &PipelineOptions,
    components: PipelineComponents,
) -> Result<Pipeline> {
    let span = tracing::info_span!("pipeline.initialize", source_count = options.sources.len());
    async move {
        let config = options
            .rag_config()
            .map_err(|e| PipelineError::initialization("invalid options", e))?;

        if options.sources.is_empty() {
            return Err(PipelineError::initialization_msg("no sources configured"));
        }

        let documents = components
            .loader
            .load_all(&options.sources)
            .await
            .map_err(|e| PipelineError::initialization("failed to load documents", e))?;
        if documents.is_empty() {
            error!("sources yielded no documents");
            return Err(PipelineError::initialization_msg("sources yielded no documents"));
        }

        let chunker = RecursiveChunker::new(config.chunk_size, config.chunk_overlap)
            .map_err(|e| PipelineError::initialization("invalid chunking", e))?;
        let chunks = chunker.split(&documents);
        if chunks.is_empty() {
            error!(document_count = documents.len(), "documents contain no indexable text");
            return Err(PipelineError::initialization_msg("documents contain no indexable text"));
        }

        let mut index = VectorIndex::new(components.embedder, components.index);
        index
            .build(&chunks)
            .await
            .map_err(|e| PipelineError::initialization("failed to build vector index", e))?;

        let graph = RagGraph::new(Arc::new(index), components.model, config.top_k);
        graph.graph().await.map_err(|e| PipelineError::initialization("invalid graph", e))?;

        info!(
            document_count = documents.len(),
            chunk_count = chunks.len(),
            top_k = config.top_k,
            "pipeline initialized"
        );
        Ok(Pipeline { graph, document_count: documents.len(), chunk_count: chunks.len() })
    }
    .instrument(span)
    .await
}

/// A built index, graph and model, ready to answer questions.
///
/// Read-only after construction: share it behind an `Arc` or a
/// [`SharedPipeline`](crate::SharedPipeline) to serve concurrent callers.
pub struct Pipeline {
    graph: RagGraph,
    document_count: usize,
    chunk_count: usize,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("document_count", &self.document_count)
            .field("chunk_count", &self.chunk_count)
            .field("top_k", &self.graph.top_k())
            .finish()
    }
}

impl Pipeline {
    /// Answer `question` from the indexed documents.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Validation`] for an empty question and
    /// [`PipelineError::Ask`] when retrieval or the model fails. A failure
    /// affects only this question.
    pub async fn ask(&self, question: &str) -> Result<AskResponse> {
        let started = Instant::now();
        let state = self.graph.run(question).await.inspect_err(|e| {
            error!(error = %e, "question failed");
        })?;
        let elapsed = started.elapsed();

        let (question, retrieved, answer) = state.into_parts();
        info!(
            retrieved = retrieved.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "question answered"
        );
        Ok(AskResponse {
            question,
            answer,
            retrieved: retrieved.into_iter().map(RetrievedPassage::from).collect(),
            elapsed,
        })
    }

    /// Documents loaded at initialization.
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// Chunks held by the index.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn top_k(&self) -> usize {
        self.graph.top_k()
    }
}
