//! Remote generation client.
//!
//! [`GenerativeClient`] is the capability boundary to the generation service:
//! a structured (schema-constrained) text completion and a multimodal image
//! completion. [`GeminiClient`] is the production implementation over the
//! Gemini `generateContent` REST API; tests substitute scripted fakes.

use async_trait::async_trait;

pub mod error;
pub mod gemini;
pub mod types;

pub use error::GenAiError;
pub use gemini::{GeminiClient, GeminiConfig};
pub use types::{ImageBlob, MultimodalRequest, Part, StructuredRequest, TokenUsage};

#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Generate text constrained by a response schema.
    ///
    /// The returned text is *expected* to parse as JSON matching the schema;
    /// the service may return non-conforming text, so callers must treat it
    /// as fallible.
    async fn structured_completion(
        &self,
        request: types::StructuredRequest,
    ) -> Result<String, error::GenAiError>;

    /// Generate content from an ordered sequence of text and image parts.
    ///
    /// Returns the response's ordered parts. Zero image parts is a valid (if
    /// unhelpful) response.
    async fn multimodal_completion(
        &self,
        request: types::MultimodalRequest,
    ) -> Result<Vec<types::Part>, error::GenAiError>;
}
