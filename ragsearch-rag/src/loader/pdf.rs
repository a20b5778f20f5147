use std::path::Path;

use async_trait::async_trait;

use super::{DEFAULT_MAX_FILE_SIZE, DocumentLoader, FileKind, Source};
use crate::document::Document;
use crate::error::{RagError, Result};

/// Extracts the text of a PDF file as one document.
#[derive(Debug, Clone)]
pub struct PdfLoader {
    /// Files larger than this many bytes are rejected.
    pub max_file_size: u64,
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self { max_file_size: DEFAULT_MAX_FILE_SIZE }
    }
}

impl PdfLoader {
    pub(crate) async fn load_file(&self, path: &Path) -> Result<Vec<Document>> {
        let name = path.display().to_string();

        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|e| RagError::load(&name, format!("cannot access: {e}")))?;
        if meta.len() > self.max_file_size {
            return Err(RagError::load(
                &name,
                format!("file too large: {} bytes (limit {})", meta.len(), self.max_file_size),
            ));
        }

        // pdf-extract is CPU bound and synchronous.
        let path_buf = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path_buf))
            .await
            .map_err(|e| RagError::load(&name, format!("extraction task failed: {e}")))?
            .map_err(|e| RagError::load(&name, format!("cannot extract PDF text: {e}")))?;

        Ok(vec![Document::from_source(name.clone(), text, name, FileKind::Pdf.content_type())])
    }
}

#[async_trait]
impl DocumentLoader for PdfLoader {
    async fn load(&self, source: &Source) -> Result<Vec<Document>> {
        match source {
            Source::Path(path) if FileKind::from_path(path) == Some(FileKind::Pdf) => {
                self.load_file(path).await
            }
            _ => Err(RagError::load(source.to_string(), "PDF loader expects a .pdf path")),
        }
    }
}
