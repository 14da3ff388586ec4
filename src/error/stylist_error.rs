//! Pipeline-level error types.

use thiserror::Error;

use super::Fault;

/// Errors raised by the selection/compositing pipeline.
#[derive(Debug, Error)]
pub enum StylistError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Generation service failure: {0}")]
    Upstream(crate::genai::GenAiError),
    #[error("Malformed selection response: {0}")]
    MalformedResponse(String),
    #[error("Selection response missing required field: {0}")]
    IncompleteSelection(&'static str),
    #[error("Generation service returned no image part")]
    NoImageReturned,
    #[error("Wardrobe item not found: {0}")]
    ItemNotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StylistError {
    /// Classification used by the HTTP boundary to pick a response status.
    pub fn fault(&self) -> Fault {
        match self {
            StylistError::InvalidInput(_) => Fault::ClientInput,
            StylistError::Upstream(_) | StylistError::MalformedResponse(_) => {
                Fault::UpstreamFailure
            }
            StylistError::IncompleteSelection(_) | StylistError::NoImageReturned => {
                Fault::ContractViolation
            }
            StylistError::ItemNotFound(_) => Fault::ResourceMissing,
            StylistError::Internal(_) => Fault::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::GenAiError;

    #[test]
    fn test_fault_classification() {
        assert_eq!(
            StylistError::InvalidInput("bad".into()).fault(),
            Fault::ClientInput
        );
        assert_eq!(
            StylistError::Upstream(GenAiError::Timeout).fault(),
            Fault::UpstreamFailure
        );
        assert_eq!(
            StylistError::MalformedResponse("not json".into()).fault(),
            Fault::UpstreamFailure
        );
        assert_eq!(
            StylistError::IncompleteSelection("best_top_path").fault(),
            Fault::ContractViolation
        );
        assert_eq!(StylistError::NoImageReturned.fault(), Fault::ContractViolation);
        assert_eq!(
            StylistError::ItemNotFound("tops/hoodie1.jpg".into()).fault(),
            Fault::ResourceMissing
        );
        assert_eq!(
            StylistError::Internal("boom".into()).fault(),
            Fault::Internal
        );
    }
}
