//! The value returned by [`Pipeline::ask`](crate::Pipeline::ask).

use std::time::Duration;

use ragsearch_rag::Chunk;
use serde::{Deserialize, Serialize};

/// Characters of chunk text shown in a passage preview.
pub const PREVIEW_CHARS: usize = 300;

/// One retrieved chunk as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    /// Full chunk text.
    pub text: String,
    /// The first [`PREVIEW_CHARS`] characters followed by `...`.
    pub preview: String,
    /// Where the chunk was loaded from, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl From<Chunk> for RetrievedPassage {
    fn from(chunk: Chunk) -> Self {
        let source = chunk.source().map(str::to_string);
        Self { preview: preview(&chunk.text), text: chunk.text, source }
    }
}

/// Answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub question: String,
    pub answer: String,
    /// Passages the answer was grounded on, most relevant first.
    pub retrieved: Vec<RetrievedPassage>,
    /// Wall-clock time spent answering.
    #[serde(rename = "elapsed_secs", with = "secs")]
    pub elapsed: Duration,
}

/// Preview text: the first [`PREVIEW_CHARS`] characters plus an ellipsis.
pub fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    preview.push_str("...");
    preview
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn preview_truncates_by_characters() {
        let long = "é".repeat(400);
        let short = preview(&long);
        assert_eq!(short.chars().count(), PREVIEW_CHARS + 3);
        assert!(short.ends_with("..."));
        assert_eq!(preview("short"), "short...");
    }

    #[test]
    fn passage_keeps_source() {
        let chunk = Chunk {
            id: "d_0".into(),
            text: "Paris is the capital of France.".into(),
            metadata: HashMap::from([("source".to_string(), "france.txt".to_string())]),
            document_id: "d".into(),
        };
        let passage = RetrievedPassage::from(chunk);
        assert_eq!(passage.source.as_deref(), Some("france.txt"));
        assert_eq!(passage.preview, "Paris is the capital of France....");
    }

    #[test]
    fn elapsed_serializes_as_seconds() {
        let response = AskResponse {
            question: "q".into(),
            answer: "a".into(),
            retrieved: Vec::new(),
            elapsed: Duration::from_millis(1500),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["elapsed_secs"], 1.5);
    }
}
