use std::path::Path;

use async_trait::async_trait;

use super::{DEFAULT_MAX_FILE_SIZE, DocumentLoader, FileKind, Source};
use crate::document::Document;
use crate::error::{RagError, Result};

/// Loads UTF-8 text and markdown files as one document each.
#[derive(Debug, Clone)]
pub struct TextLoader {
    /// Files larger than this many bytes are rejected.
    pub max_file_size: u64,
}

impl Default for TextLoader {
    fn default() -> Self {
        Self { max_file_size: DEFAULT_MAX_FILE_SIZE }
    }
}

impl TextLoader {
    pub(crate) async fn load_file(&self, path: &Path, kind: FileKind) -> Result<Vec<Document>> {
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

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RagError::load(&name, format!("cannot read as UTF-8 text: {e}")))?;

        Ok(vec![Document::from_source(name.clone(), text, name, kind.content_type())])
    }
}

#[async_trait]
impl DocumentLoader for TextLoader {
    async fn load(&self, source: &Source) -> Result<Vec<Document>> {
        let Source::Path(path) = source else {
            return Err(RagError::load(source.to_string(), "text loader expects a file path"));
        };
        match FileKind::from_path(path) {
            Some(kind @ (FileKind::Text | FileKind::Markdown)) => self.load_file(path, kind).await,
            _ => Err(RagError::load(source.to_string(), "unsupported file type for text loader")),
        }
    }
}
