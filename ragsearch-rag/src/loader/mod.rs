//! Document loaders.
//!
//! A [`Source`] is either a URL or a filesystem path. [`SourceLoader`] maps
//! every source to exactly one loader:
//!
//! | Source | Loader |
//! |--------|--------|
//! | `http://…`, `https://…` | [`WebLoader`] (feature `web`) |
//! | directory | [`DirectoryLoader`] |
//! | `.txt`, `.md`, `.markdown` | [`TextLoader`] |
//! | `.pdf` | [`PdfLoader`] (feature `pdf`) |
//!
//! Anything else fails with [`RagError::Load`].

mod directory;
#[cfg(feature = "pdf")]
mod pdf;
mod source;
mod text;
#[cfg(feature = "web")]
mod web;

use std::path::Path;

use async_trait::async_trait;
use tracing::{error, info};

pub use directory::DirectoryLoader;
#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;
pub use source::{FileKind, Source};
pub use text::TextLoader;
#[cfg(feature = "web")]
pub use web::WebLoader;

use crate::document::Document;
use crate::error::{RagError, Result};

/// Default maximum file size: 50 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Turns a [`Source`] into documents.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Load every document the source yields.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Load`] for an unreachable URL, a missing file,
    /// or an unsupported type.
    async fn load(&self, source: &Source) -> Result<Vec<Document>>;

    /// Load several sources in order, stopping at the first failure.
    async fn load_all(&self, sources: &[Source]) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for source in sources {
            documents.extend(self.load(source).await?);
        }
        Ok(documents)
    }
}

/// The default loader: dispatches each source to the loader for its kind.
#[derive(Debug, Clone, Default)]
pub struct SourceLoader {
    text: TextLoader,
    directory: DirectoryLoader,
    #[cfg(feature = "web")]
    web: WebLoader,
}

impl SourceLoader {
    /// Create a loader with default settings for every source kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the web loader (e.g. to set a timeout or user agent).
    #[cfg(feature = "web")]
    pub fn with_web_loader(mut self, web: WebLoader) -> Self {
        self.web = web;
        self
    }

    async fn load_path(&self, path: &Path) -> Result<Vec<Document>> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| RagError::load(path.display().to_string(), format!("cannot access: {e}")))?;

        if metadata.is_dir() {
            return self.directory.load_dir(path).await;
        }

        match FileKind::from_path(path) {
            Some(kind) => load_file(path, kind, &self.text).await,
            None => Err(RagError::load(path.display().to_string(), "unsupported file type")),
        }
    }

    #[cfg(feature = "web")]
    async fn load_url(&self, url: &str) -> Result<Vec<Document>> {
        self.web.load_url(url).await
    }

    #[cfg(not(feature = "web"))]
    async fn load_url(&self, url: &str) -> Result<Vec<Document>> {
        Err(RagError::load(url, "URL loading is not enabled (build with the `web` feature)"))
    }
}

#[async_trait]
impl DocumentLoader for SourceLoader {
    async fn load(&self, source: &Source) -> Result<Vec<Document>> {
        let result = match source {
            Source::Url(url) => self.load_url(url).await,
            Source::Path(path) => self.load_path(path).await,
        };

        match &result {
            Ok(documents) => info!(%source, document_count = documents.len(), "loaded source"),
            Err(e) => error!(%source, error = %e, "failed to load source"),
        }
        result
    }
}

/// Load one file of a known kind.
pub(crate) async fn load_file(path: &Path, kind: FileKind, text: &TextLoader) -> Result<Vec<Document>> {
    match kind {
        FileKind::Text | FileKind::Markdown => text.load_file(path, kind).await,
        FileKind::Pdf => load_pdf(path).await,
    }
}

#[cfg(feature = "pdf")]
async fn load_pdf(path: &Path) -> Result<Vec<Document>> {
    PdfLoader::default().load_file(path).await
}

#[cfg(not(feature = "pdf"))]
async fn load_pdf(path: &Path) -> Result<Vec<Document>> {
    Err(RagError::load(
        path.display().to_string(),
        "PDF loading is not enabled (build with the `pdf` feature)",
    ))
}
