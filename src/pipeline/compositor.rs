//! Try-on image compositing.

use std::sync::Arc;

use crate::closet::Closet;
use crate::error::StylistError;
use crate::genai::{GenerativeClient, ImageBlob, MultimodalRequest, Part};

const COMPOSITOR_INSTRUCTION: &str = "There is an image of a person and images of additional \
clothes. Generate an image of the person wearing the clothes provided. Replace BOTH the top and \
the bottom from what the person is currently wearing. Keep the same person, upright, full body \
centered, natural lighting.";

pub struct ImageCompositor {
    client: Arc<dyn GenerativeClient>,
    closet: Arc<dyn Closet>,
    model: String,
}

impl ImageCompositor {
    pub fn new(
        client: Arc<dyn GenerativeClient>,
        closet: Arc<dyn Closet>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            closet,
            model: model.into(),
        }
    }

    /// Render the person wearing the two selected garments.
    ///
    /// Both identifiers are resolved before any network call: a missing file
    /// will not appear after a retry, so resolution failures are fatal for
    /// the request. The response is scanned in order for the first image
    /// part; a response with none is a contract violation.
    pub async fn composite(
        &self,
        person: &ImageBlob,
        top_id: &str,
        bottom_id: &str,
    ) -> Result<ImageBlob, StylistError> {
        let top = self.closet.load_garment(top_id)?;
        let bottom = self.closet.load_garment(bottom_id)?;

        let request = MultimodalRequest {
            model: self.model.clone(),
            parts: vec![
                Part::text(COMPOSITOR_INSTRUCTION),
                Part::InlineImage(person.clone()),
                Part::InlineImage(top),
                Part::InlineImage(bottom),
            ],
        };

        let parts = self.client.multimodal_completion(request).await?;

        parts
            .into_iter()
            .find_map(|part| match part {
                Part::InlineImage(blob) => Some(blob),
                Part::Text(_) => None,
            })
            .ok_or(StylistError::NoImageReturned)
    }
}
