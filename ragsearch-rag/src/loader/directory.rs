use std::path::Path;

use async_trait::async_trait;
use tracing::debug;
use walkdir::WalkDir;

use super::{DocumentLoader, FileKind, Source, TextLoader, load_file};
use crate::document::Document;
use crate::error::{RagError, Result};

/// Loads every supported file under a directory, recursively, in path order.
///
/// Files whose kind is unknown, or not enabled in this build, are skipped.
#[derive(Debug, Clone, Default)]
pub struct DirectoryLoader {
    text: TextLoader,
}

impl DirectoryLoader {
    pub(crate) async fn load_dir(&self, dir: &Path) -> Result<Vec<Document>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                RagError::load(dir.display().to_string(), format!("cannot walk directory: {e}"))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            match FileKind::from_path(entry.path()) {
                Some(kind) if kind.is_enabled() => files.push((entry.into_path(), kind)),
                _ => debug!(path = %entry.path().display(), "skipping unsupported file"),
            }
        }

        let mut documents = Vec::new();
        for (path, kind) in files {
            documents.extend(load_file(&path, kind, &self.text).await?);
        }
        Ok(documents)
    }
}

#[async_trait]
impl DocumentLoader for DirectoryLoader {
    async fn load(&self, source: &Source) -> Result<Vec<Document>> {
        match source {
            Source::Path(path) if path.is_dir() => self.load_dir(path).await,
            _ => Err(RagError::load(source.to_string(), "not a directory")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[tokio::test]
    async fn walks_nested_directories_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("c.txt"), "C").unwrap();
        fs::write(dir.path().join("b.txt"), "B").unwrap();
        fs::write(dir.path().join("a.txt"), "A").unwrap();

        let documents =
            DirectoryLoader::default().load(&Source::Path(dir.path().to_path_buf())).await.unwrap();
        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn empty_directory_yields_no_documents() {
        let dir = tempfile::tempdir().unwrap();
        let documents =
            DirectoryLoader::default().load(&Source::Path(dir.path().to_path_buf())).await.unwrap();
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn files_are_not_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        fs::write(&path, "A").unwrap();
        assert!(DirectoryLoader::default().load(&Source::Path(path)).await.is_err());
    }
}
