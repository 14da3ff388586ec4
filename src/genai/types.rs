//! Data types for the remote generation API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A mime-labeled image payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// One part of a generation request or response — text or inline image data.
///
/// Responses are modeled as a tagged variant so consumers perform a typed
/// search for image parts instead of probing unknown structures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    InlineImage(ImageBlob),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(text.into())
    }

    pub fn image(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Part::InlineImage(ImageBlob::new(mime_type, bytes))
    }

    pub fn as_image(&self) -> Option<&ImageBlob> {
        match self {
            Part::InlineImage(blob) => Some(blob),
            Part::Text(_) => None,
        }
    }
}

/// Request for a structured (schema-constrained) text completion.
///
/// The schema is forwarded to the service as a generation constraint; it is a
/// hint, not a guarantee — callers must validate the returned text.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub model: String,
    pub instruction: String,
    pub prompt: String,
    pub schema: Value,
}

/// Request for a multimodal completion: an ordered sequence of parts.
#[derive(Debug, Clone)]
pub struct MultimodalRequest {
    pub model: String,
    pub parts: Vec<Part>,
}

/// Token accounting reported by the generation service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: i64,
    pub response_tokens: i64,
    pub total_tokens: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_as_image() {
        let text = Part::text("hello");
        assert!(text.as_image().is_none());

        let image = Part::image("image/png", vec![1, 2, 3]);
        let blob = image.as_image().unwrap();
        assert_eq!(blob.mime_type, "image/png");
        assert_eq!(blob.bytes, vec![1, 2, 3]);
    }
}
