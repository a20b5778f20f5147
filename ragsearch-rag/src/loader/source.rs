use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where documents come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    /// An `http://` or `https://` URL.
    Url(String),
    /// A file or directory on the local filesystem.
    Path(PathBuf),
}

impl Source {
    /// Classify a source string: `http://` and `https://` prefixes are URLs,
    /// everything else is a path.
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(source.to_string())
        } else {
            Self::Path(PathBuf::from(source))
        }
    }
}

impl From<String> for Source {
    fn from(source: String) -> Self {
        Self::parse(&source)
    }
}

impl From<&str> for Source {
    fn from(source: &str) -> Self {
        Self::parse(source)
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.to_string()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// File types the loaders understand, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `.txt`
    Text,
    /// `.md`, `.markdown`
    Markdown,
    /// `.pdf`
    Pdf,
}

impl FileKind {
    /// Infer the kind from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(Self::Text),
            "md" | "markdown" => Some(Self::Markdown),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// MIME type recorded in document metadata.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Markdown => "text/markdown",
            Self::Pdf => "application/pdf",
        }
    }

    /// Whether this build can load the kind.
    pub fn is_enabled(self) -> bool {
        match self {
            Self::Text | Self::Markdown => true,
            Self::Pdf => cfg!(feature = "pdf"),
        }
    }
}
