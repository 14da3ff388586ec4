//! Outfit selection via schema-constrained completion.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::catalog::Catalog;
use crate::error::StylistError;
use crate::genai::{GenAiError, GenerativeClient, StructuredRequest};
use crate::retry::{with_retry, RetryPolicy};

const SELECTOR_INSTRUCTION: &str = "You are an expert personal stylist. Your task is to recommend \
one Top item and one Bottom item from the provided INVENTORY. You MUST respond with a single JSON \
object that strictly adheres to the provided schema and contains ONLY the two file paths. The \
selected items MUST be compatible with the user's request (e.g., season, occasion) and be \
color-coordinated. Do not include any additional text or summaries.";

/// Response schema sent to the generation service. A constraint hint only —
/// the returned text is still validated after parsing.
fn outfit_schema() -> Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "best_top_path": {
                "type": "STRING",
                "description": "The EXACT file path (key) of the single best item suitable for a Top layer (like a shirt, sweater, or jacket) from the inventory."
            },
            "best_bottom_path": {
                "type": "STRING",
                "description": "The EXACT file path (key) of the single best item suitable for a Bottom layer (like trousers, shorts, or a skirt) from the inventory."
            }
        },
        "required": ["best_top_path", "best_bottom_path"]
    })
}

/// The two identifiers chosen from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutfitSelection {
    pub top: String,
    pub bottom: String,
}

/// Wire shape of the selection response. Missing fields deserialize to empty
/// strings so the presence check below is the single validation point.
#[derive(Debug, Deserialize)]
struct SelectionPayload {
    #[serde(default)]
    best_top_path: String,
    #[serde(default)]
    best_bottom_path: String,
}

pub struct OutfitSelector {
    client: Arc<dyn GenerativeClient>,
    model: String,
    retry: RetryPolicy,
}

impl OutfitSelector {
    pub fn new(client: Arc<dyn GenerativeClient>, model: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            client,
            model: model.into(),
            retry,
        }
    }

    /// Pick the best top/bottom pairing for `user_request`.
    ///
    /// The full catalog is embedded verbatim in the prompt so the model can
    /// cross-reference attributes for color/season coordination. Unparseable
    /// responses are retried as transient; a parsed response with a missing
    /// or empty field is a contract violation and is not retried here.
    pub async fn select(
        &self,
        user_request: &str,
        catalog: &Catalog,
    ) -> Result<OutfitSelection, StylistError> {
        let prompt = format!(
            "The user's request is: '{user_request}'\n\n\
             INVENTORY (Keys are file paths/IDs and values are metadata):\n\
             {inventory}\n\n\
             Please select the single best Top and single best Bottom to form a cohesive \
             outfit and provide ONLY the structured output.",
            inventory = catalog.to_prompt_json(),
        );

        let payload = with_retry(self.retry, || {
            let request = StructuredRequest {
                model: self.model.clone(),
                instruction: SELECTOR_INSTRUCTION.into(),
                prompt: prompt.clone(),
                schema: outfit_schema(),
            };
            async move {
                let text = self.client.structured_completion(request).await?;
                serde_json::from_str::<SelectionPayload>(text.trim())
                    .map_err(|e| GenAiError::SerializationError(e.to_string()))
            }
        })
        .await
        .map_err(|e| match e {
            GenAiError::SerializationError(msg) => StylistError::MalformedResponse(msg),
            other => StylistError::Upstream(other),
        })?;

        if payload.best_top_path.is_empty() {
            return Err(StylistError::IncompleteSelection("best_top_path"));
        }
        if payload.best_bottom_path.is_empty() {
            return Err(StylistError::IncompleteSelection("best_bottom_path"));
        }

        Ok(OutfitSelection {
            top: payload.best_top_path,
            bottom: payload.best_bottom_path,
        })
    }
}
