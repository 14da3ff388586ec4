use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;

use async_trait::async_trait;

use crate::genai::error::GenAiError;
use crate::genai::types::{ImageBlob, MultimodalRequest, Part, StructuredRequest, TokenUsage};
use crate::genai::GenerativeClient;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn build_headers(&self) -> Result<HeaderMap, GenAiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(&self.config.api_key)
                .map_err(|e| GenAiError::InvalidRequest(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn request_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    fn part_to_value(part: &Part) -> Value {
        match part {
            Part::Text(text) => serde_json::json!({ "text": text }),
            Part::InlineImage(blob) => serde_json::json!({
                "inlineData": {
                    "mimeType": blob.mime_type,
                    "data": STANDARD.encode(&blob.bytes),
                }
            }),
        }
    }

    fn build_payload(parts: &[Part], schema: Option<&Value>) -> Value {
        let wire_parts = parts.iter().map(Self::part_to_value).collect::<Vec<_>>();
        let mut payload = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": wire_parts,
            }],
        });

        if let Some(schema) = schema {
            payload["generationConfig"] = serde_json::json!({
                "responseMimeType": "application/json",
                "responseSchema": schema,
            });
        }

        payload
    }

    fn parse_usage(body: &Value) -> TokenUsage {
        let usage = body.get("usageMetadata").cloned().unwrap_or(Value::Null);
        TokenUsage {
            prompt_tokens: usage
                .get("promptTokenCount")
                .and_then(|v| v.as_i64())
                .unwrap_or(0),
            response_tokens: usage
                .get("candidatesTokenCount")
                .and_then(|v| v.as_i64())
                .unwrap_or(0),
            total_tokens: usage
                .get("totalTokenCount")
                .and_then(|v| v.as_i64())
                .unwrap_or(0),
        }
    }

    /// Walk `candidates[0].content.parts`, mapping each wire part into a
    /// typed [`Part`]. Parts that are neither text nor inline image data are
    /// skipped.
    fn parse_parts(body: &Value) -> Result<Vec<Part>, GenAiError> {
        let wire_parts = body
            .get("candidates")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut parts = Vec::with_capacity(wire_parts.len());
        for wire_part in &wire_parts {
            if let Some(text) = wire_part.get("text").and_then(|v| v.as_str()) {
                parts.push(Part::Text(text.to_string()));
            } else if let Some(inline) = wire_part.get("inlineData") {
                let mime_type = inline
                    .get("mimeType")
                    .and_then(|v| v.as_str())
                    .unwrap_or("image/png")
                    .to_string();
                let data = inline.get("data").and_then(|v| v.as_str()).unwrap_or("");
                let bytes = STANDARD
                    .decode(data)
                    .map_err(|e| GenAiError::SerializationError(e.to_string()))?;
                parts.push(Part::InlineImage(ImageBlob { mime_type, bytes }));
            }
        }
        Ok(parts)
    }

    fn map_error(status: u16, body: &str) -> GenAiError {
        if status == 401 || status == 403 {
            return GenAiError::AuthenticationError(body.to_string());
        }
        if status == 429 {
            return GenAiError::RateLimitExceeded { retry_after: None };
        }
        GenAiError::ApiError {
            status,
            message: body.to_string(),
        }
    }

    async fn generate(
        &self,
        model: &str,
        parts: &[Part],
        schema: Option<&Value>,
    ) -> Result<(Vec<Part>, TokenUsage), GenAiError> {
        let headers = self.build_headers()?;
        let url = self.request_url(model);
        let payload = Self::build_payload(parts, schema);

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenAiError::Timeout
                } else {
                    GenAiError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenAiError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            return Err(Self::map_error(status.as_u16(), &text));
        }

        let body: Value = serde_json::from_str(&text)
            .map_err(|e| GenAiError::SerializationError(e.to_string()))?;

        let usage = Self::parse_usage(&body);
        tracing::debug!(
            model,
            prompt_tokens = usage.prompt_tokens,
            response_tokens = usage.response_tokens,
            total_tokens = usage.total_tokens,
            "generation call completed"
        );

        Ok((Self::parse_parts(&body)?, usage))
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn structured_completion(
        &self,
        request: StructuredRequest,
    ) -> Result<String, GenAiError> {
        let parts = vec![
            Part::text(request.instruction),
            Part::text(request.prompt),
        ];
        let (parts, _usage) = self
            .generate(&request.model, &parts, Some(&request.schema))
            .await?;

        let text = parts
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                Part::InlineImage(_) => None,
            })
            .collect::<Vec<_>>()
            .join("");
        Ok(text)
    }

    async fn multimodal_completion(
        &self,
        request: MultimodalRequest,
    ) -> Result<Vec<Part>, GenAiError> {
        let (parts, _usage) = self.generate(&request.model, &request.parts, None).await?;
        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn client_for(server: &Server) -> GeminiClient {
        GeminiClient::new(GeminiConfig::new("test-key").with_base_url(server.url()))
    }

    fn structured_request() -> StructuredRequest {
        StructuredRequest {
            model: "gemini-2.5-flash".into(),
            instruction: "pick an outfit".into(),
            prompt: "casual fall".into(),
            schema: serde_json::json!({
                "type": "OBJECT",
                "properties": {
                    "best_top_path": { "type": "STRING" },
                    "best_bottom_path": { "type": "STRING" }
                },
                "required": ["best_top_path", "best_bottom_path"]
            }),
        }
    }

    #[tokio::test]
    async fn test_structured_completion() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "{\"best_top_path\":\"a\",\"best_bottom_path\":\"b\"}"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
            }"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let text = client.structured_completion(structured_request()).await.unwrap();
        assert_eq!(text, r#"{"best_top_path":"a","best_bottom_path":"b"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_multimodal_completion_returns_typed_parts() {
        let mut server = Server::new_async().await;
        let image_b64 = STANDARD.encode(b"rendered-pixels");
        let body = format!(
            r#"{{
            "candidates": [{{
                "content": {{"parts": [
                    {{"text": "here you go"}},
                    {{"inlineData": {{"mimeType": "image/png", "data": "{image_b64}"}}}}
                ]}}
            }}]
        }}"#
        );
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash-image:generateContent")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let client = client_for(&server);
        let parts = client
            .multimodal_completion(MultimodalRequest {
                model: "gemini-2.5-flash-image".into(),
                parts: vec![
                    Part::text("replace the outfit"),
                    Part::image("image/jpeg", vec![0xFF, 0xD8, 0xFF]),
                ],
            })
            .await
            .unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], Part::Text("here you go".into()));
        let blob = parts[1].as_image().unwrap();
        assert_eq!(blob.mime_type, "image/png");
        assert_eq!(blob.bytes, b"rendered-pixels");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_payload_shape() {
        let payload = GeminiClient::build_payload(
            &[
                Part::text("instruction"),
                Part::image("image/jpeg", vec![1, 2, 3]),
            ],
            Some(&serde_json::json!({"type": "OBJECT"})),
        );

        assert_eq!(payload["contents"][0]["role"], "user");
        assert_eq!(payload["contents"][0]["parts"][0]["text"], "instruction");
        assert_eq!(
            payload["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/jpeg"
        );
        assert_eq!(
            payload["contents"][0]["parts"][1]["inlineData"]["data"],
            STANDARD.encode([1, 2, 3])
        );
        assert_eq!(
            payload["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(payload["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[tokio::test]
    async fn test_payload_without_schema_has_no_generation_config() {
        let payload = GeminiClient::build_payload(&[Part::text("hi")], None);
        assert!(payload.get("generationConfig").is_none());
    }

    #[tokio::test]
    async fn test_error_mapping() {
        for (status, expect_auth, expect_rate) in
            [(401, true, false), (403, true, false), (429, false, true)]
        {
            let mut server = Server::new_async().await;
            let _mock = server
                .mock("POST", "/models/gemini-2.5-flash:generateContent")
                .with_status(status)
                .with_body("denied")
                .create_async()
                .await;

            let client = client_for(&server);
            let err = client
                .structured_completion(structured_request())
                .await
                .unwrap_err();
            match err {
                GenAiError::AuthenticationError(_) => assert!(expect_auth),
                GenAiError::RateLimitExceeded { .. } => assert!(expect_rate),
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[tokio::test]
    async fn test_server_error_maps_to_api_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .structured_completion(structured_request())
            .await
            .unwrap_err();
        assert!(matches!(err, GenAiError::ApiError { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_serialization_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .structured_completion(structured_request())
            .await
            .unwrap_err();
        assert!(matches!(err, GenAiError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_bad_inline_data_is_serialization_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash-image:generateContent")
            .with_status(200)
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"!!!"}}]}}]}"#,
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let err = client
            .multimodal_completion(MultimodalRequest {
                model: "gemini-2.5-flash-image".into(),
                parts: vec![Part::text("go")],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GenAiError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_empty_candidates_yield_no_parts() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/gemini-2.5-flash-image:generateContent")
            .with_status(200)
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let parts = client
            .multimodal_completion(MultimodalRequest {
                model: "gemini-2.5-flash-image".into(),
                parts: vec![Part::text("go")],
            })
            .await
            .unwrap();
        assert!(parts.is_empty());
    }
}
