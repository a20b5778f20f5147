use std::error::Error as _;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ragsearch::graph::{GraphError, REFUSAL_PHRASE};
use ragsearch::model::{ModelError, ScriptedModel};
use ragsearch::rag::{
    Document, DocumentLoader, HashingEmbedder, RagError, Source, SourceLoader,
};
use ragsearch::{
    PipelineComponents, PipelineError, PipelineOptions, SharedPipeline, global, initialize_with,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, text).unwrap();
    path.display().to_string()
}

fn corpus() -> (TempDir, PipelineOptions) {
    let dir = tempfile::tempdir().unwrap();
    let france = write(dir.path(), "france.txt", "Paris is the capital of France.");
    let eiffel = write(dir.path(), "eiffel.txt", "The Eiffel Tower is in Paris.");
    let options = PipelineOptions::new([france, eiffel]).with_chunking(500, 50).with_top_k(4);
    (dir, options)
}

fn components(model: Arc<ScriptedModel>) -> PipelineComponents {
    PipelineComponents::new(Arc::new(HashingEmbedder::default()), model)
}

struct CountingLoader {
    inner: SourceLoader,
    calls: AtomicUsize,
}

#[async_trait]
impl DocumentLoader for CountingLoader {
    async fn load(&self, source: &Source) -> ragsearch::rag::Result<Vec<Document>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        self.inner.load(source).await
    }
}

#[tokio::test]
async fn answers_from_the_indexed_documents() {
    let (_dir, options) = corpus();
    let model = Arc::new(
        ScriptedModel::new(REFUSAL_PHRASE)
            .with_script([Ok("Paris is the capital of France.".to_string())]),
    );
    let pipeline = initialize_with(&options, components(model.clone())).await.unwrap();

    assert_eq!(pipeline.document_count(), 2);
    assert_eq!(pipeline.chunk_count(), 2);

    let response = pipeline.ask("What is the capital of France?").await.unwrap();
    assert_eq!(response.question, "What is the capital of France?");
    assert!(response.answer.contains("Paris"));
    let top = &response.retrieved[0];
    assert_eq!(top.text, "Paris is the capital of France.");
    assert_eq!(top.preview, "Paris is the capital of France....");
    assert!(top.source.as_deref().is_some_and(|s| s.ends_with("france.txt")));
    assert!(model.prompts()[0].contains("Paris is the capital of France."));

    let response = pipeline.ask("What is the capital of Germany?").await.unwrap();
    assert_eq!(response.answer, REFUSAL_PHRASE);
    assert_eq!(model.call_count(), 2);
}

#[tokio::test]
async fn unreachable_source_fails_initialization() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt").display().to_string();
    let options = PipelineOptions::new([missing]);
    let model = Arc::new(ScriptedModel::new("unused"));

    let err = initialize_with(&options, components(model.clone())).await.unwrap_err();

    assert!(matches!(err, PipelineError::Initialization { .. }));
    let source = err.source().and_then(|s| s.downcast_ref::<RagError>());
    assert!(matches!(source, Some(RagError::Load { .. })));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn one_bad_source_fails_the_whole_build() {
    let (dir, options) = corpus();
    let mut sources = options.sources.clone();
    sources.push(Source::parse(&dir.path().join("notes.docx").display().to_string()));
    let options = PipelineOptions { sources, ..options };

    let err = initialize_with(&options, components(Arc::new(ScriptedModel::new("")))).await;

    assert!(matches!(err, Err(PipelineError::Initialization { .. })));
}

#[tokio::test]
async fn no_sources_fails_initialization() {
    let options = PipelineOptions { sources: Vec::new(), ..PipelineOptions::default() };
    let err = initialize_with(&options, components(Arc::new(ScriptedModel::new("")))).await;
    assert!(matches!(err, Err(PipelineError::Initialization { message, .. }) if message.contains("no sources")));
}

#[tokio::test]
async fn blank_documents_fail_initialization() {
    let dir = tempfile::tempdir().unwrap();
    let blank = write(dir.path(), "blank.txt", "  \n\n ");
    let options = PipelineOptions::new([blank]);
    let err = initialize_with(&options, components(Arc::new(ScriptedModel::new("")))).await;
    assert!(matches!(err, Err(PipelineError::Initialization { .. })));
}

#[tokio::test]
async fn invalid_chunking_fails_initialization() {
    let (_dir, options) = corpus();
    let options = options.with_chunking(50, 50);
    let err = initialize_with(&options, components(Arc::new(ScriptedModel::new("")))).await;
    assert!(matches!(err, Err(PipelineError::Initialization { .. })));
}

#[tokio::test]
async fn empty_question_is_a_validation_error() {
    let (_dir, options) = corpus();
    let model = Arc::new(ScriptedModel::new("unused"));
    let pipeline = initialize_with(&options, components(model.clone())).await.unwrap();

    assert!(matches!(pipeline.ask("   ").await, Err(PipelineError::Validation(_))));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn model_failure_affects_only_one_question() {
    let (_dir, options) = corpus();
    let model = Arc::new(ScriptedModel::failing_once("Paris."));
    let pipeline = initialize_with(&options, components(model)).await.unwrap();

    let err = pipeline.ask("What is the capital of France?").await.unwrap_err();
    assert!(matches!(err, PipelineError::Ask(GraphError::Model(ModelError::Quota { .. }))));

    let response = pipeline.ask("What is the capital of France?").await.unwrap();
    assert_eq!(response.answer, "Paris.");
}

#[tokio::test]
async fn concurrent_first_calls_build_once() {
    let (_dir, options) = corpus();
    let loader = Arc::new(CountingLoader { inner: SourceLoader::new(), calls: AtomicUsize::new(0) });
    let shared = SharedPipeline::new();

    let build = || {
        let parts = components(Arc::new(ScriptedModel::new("Paris."))).with_loader(loader.clone());
        initialize_with(&options, parts)
    };
    let (first, second) = tokio::join!(shared.get_or_initialize(build), shared.get_or_initialize(build));

    let (first, second) = (first.unwrap(), second.unwrap());
    assert!(std::ptr::eq(first, second));
    assert_eq!(loader.calls.load(Ordering::SeqCst), options.sources.len());
    assert!(shared.is_initialized());
    assert_eq!(shared.ask("What is the capital of France?").await.unwrap().answer, "Paris.");
}

#[tokio::test]
async fn failed_shared_build_can_be_retried() {
    let (dir, options) = corpus();
    let shared = SharedPipeline::new();
    let broken = PipelineOptions::new([dir.path().join("missing.txt").display().to_string()]);

    let err = shared
        .get_or_initialize(|| initialize_with(&broken, components(Arc::new(ScriptedModel::new("")))))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Initialization { .. }));
    assert!(!shared.is_initialized());
    assert!(matches!(shared.ask("q").await, Err(PipelineError::NotInitialized)));

    shared
        .get_or_initialize(|| initialize_with(&options, components(Arc::new(ScriptedModel::new("ok")))))
        .await
        .unwrap();
    assert_eq!(shared.ask("What is in Paris?").await.unwrap().answer, "ok");
}

#[tokio::test]
async fn global_pipeline_is_shared() {
    let (_dir, options) = corpus();
    let pipeline = global()
        .get_or_initialize(|| initialize_with(&options, components(Arc::new(ScriptedModel::new("ok")))))
        .await
        .unwrap();

    assert!(global().is_initialized());
    assert!(std::ptr::eq(pipeline, global().get().unwrap()));
}
