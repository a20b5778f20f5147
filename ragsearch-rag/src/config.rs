//! Chunking and retrieval parameters.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Default maximum chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;
/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;
/// Default number of chunks returned per query.
pub const DEFAULT_TOP_K: usize = 4;

/// How documents are cut up and how many chunks a question pulls back.
///
/// Sizes are in characters. Valid when `chunk_size > chunk_overlap` and `top_k >= 1`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RagConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl RagConfig {
    /// Start from the defaults and override fields one at a time.
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// # Errors
    ///
    /// [`RagError::Validation`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        validate_chunking(self.chunk_size, self.chunk_overlap)?;
        if self.top_k == 0 {
            return Err(RagError::Validation("top_k must be greater than zero".to_string()));
        }
        Ok(())
    }
}

/// Validate a chunk-size/overlap pair: `chunk_size > chunk_overlap >= 0`.
pub(crate) fn validate_chunking(chunk_size: usize, chunk_overlap: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(RagError::Validation("chunk_size must be greater than zero".to_string()));
    }
    if chunk_overlap >= chunk_size {
        return Err(RagError::Validation(format!(
            "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
        )));
    }
    Ok(())
}

/// Builder returned by [`RagConfig::builder`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    inner: RagConfig,
}

impl RagConfigBuilder {
    pub fn chunk_size(self, chunk_size: usize) -> Self {
        Self { inner: RagConfig { chunk_size, ..self.inner } }
    }

    pub fn chunk_overlap(self, chunk_overlap: usize) -> Self {
        Self { inner: RagConfig { chunk_overlap, ..self.inner } }
    }

    pub fn top_k(self, top_k: usize) -> Self {
        Self { inner: RagConfig { top_k, ..self.inner } }
    }

    /// # Errors
    ///
    /// See [`RagConfig::validate`].
    pub fn build(self) -> Result<RagConfig> {
        self.inner.validate().map(|()| self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = RagConfig::default();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.chunk_overlap, 50);
        assert_eq!(config.top_k, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overlap_must_be_smaller_than_chunk_size() {
        let err = RagConfig::builder().chunk_size(100).chunk_overlap(100).build().unwrap_err();
        assert!(matches!(err, RagError::Validation(_)));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let err = RagConfig::builder().chunk_size(0).chunk_overlap(0).build().unwrap_err();
        assert!(matches!(err, RagError::Validation(_)));
    }

    #[test]
    fn zero_top_k_is_rejected() {
        assert!(RagConfig::builder().top_k(0).build().is_err());
    }

    #[test]
    fn zero_overlap_is_allowed() {
        let config = RagConfig::builder().chunk_size(10).chunk_overlap(0).build().unwrap();
        assert_eq!(config.chunk_overlap, 0);
    }
}
