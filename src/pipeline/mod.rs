//! The outfit styling pipeline.
//!
//! [`StylistPipeline`] sequences the two stages with real work in them —
//! outfit selection and try-on compositing — around transport decode/encode,
//! and is the single point where stage failures are mapped to classified
//! errors. Selection must complete before compositing begins; there is no
//! internal parallelism and no cross-request shared mutable state.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::closet::Closet;
use crate::error::{StylistError, StylistResult};
use crate::genai::{GenerativeClient, ImageBlob};
use crate::retry::RetryPolicy;
use crate::transport;

pub mod compositor;
pub mod selector;

pub use compositor::ImageCompositor;
pub use selector::{OutfitSelection, OutfitSelector};

/// Models and retry budget used by the pipeline stages.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub selection_model: String,
    pub image_model: String,
    pub retry: RetryPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            selection_model: "gemini-2.5-flash".into(),
            image_model: "gemini-2.5-flash-image".into(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Stages of one styling request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Decoding,
    Selecting,
    Compositing,
    Encoding,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Decoding => "decoding",
            PipelineStage::Selecting => "selecting",
            PipelineStage::Compositing => "compositing",
            PipelineStage::Encoding => "encoding",
        };
        f.write_str(name)
    }
}

/// Complete pipeline result: the rendered image plus the two chosen
/// identifiers, so the caller can display and explain the choice.
#[derive(Debug, Clone, Serialize)]
pub struct StyledOutfit {
    pub result_image_b64: String,
    pub best_top_path: String,
    pub best_bottom_path: String,
}

pub struct StylistPipeline {
    selector: OutfitSelector,
    compositor: ImageCompositor,
    catalog: Arc<Catalog>,
}

impl StylistPipeline {
    pub fn new(
        client: Arc<dyn GenerativeClient>,
        closet: Arc<dyn Closet>,
        catalog: Arc<Catalog>,
        options: PipelineOptions,
    ) -> Self {
        let selector = OutfitSelector::new(client.clone(), options.selection_model, options.retry);
        let compositor = ImageCompositor::new(client, closet, options.image_model);
        Self {
            selector,
            compositor,
            catalog,
        }
    }

    /// Run one styling request to completion or failure.
    ///
    /// Either the complete {image, top, bottom} triple is produced or an
    /// error is reported; no partial results.
    pub async fn run(
        &self,
        user_request: &str,
        person_image_b64: &str,
    ) -> StylistResult<StyledOutfit> {
        let mut stage = PipelineStage::Decoding;
        let result = self.run_stages(user_request, person_image_b64, &mut stage).await;
        if let Err(e) = &result {
            tracing::error!(
                stage = %stage,
                fault = ?e.fault(),
                error = %e,
                "styling request failed"
            );
        }
        result
    }

    async fn run_stages(
        &self,
        user_request: &str,
        person_image_b64: &str,
        stage: &mut PipelineStage,
    ) -> StylistResult<StyledOutfit> {
        if user_request.trim().is_empty() {
            return Err(StylistError::InvalidInput("empty styling request".into()));
        }

        let person_bytes = transport::decode_image(person_image_b64)?;
        let mime = transport::sniff_mime(&person_bytes);
        let person = ImageBlob::new(mime, person_bytes);

        *stage = PipelineStage::Selecting;
        let selection = self.selector.select(user_request, &self.catalog).await?;
        tracing::info!(top = %selection.top, bottom = %selection.bottom, "outfit selected");

        *stage = PipelineStage::Compositing;
        let rendered = self
            .compositor
            .composite(&person, &selection.top, &selection.bottom)
            .await?;

        *stage = PipelineStage::Encoding;
        let result_image_b64 = transport::encode_image(&rendered.bytes);
        tracing::info!(
            rendered_bytes = rendered.bytes.len(),
            mime = %rendered.mime_type,
            "styling request complete"
        );

        Ok(StyledOutfit {
            result_image_b64,
            best_top_path: selection.top,
            best_bottom_path: selection.bottom,
        })
    }
}
