use thiserror::Error;

use crate::error::StylistError;
use crate::retry::Transient;

/// Errors raised by the remote generation client.
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Rate limit exceeded: retry after {retry_after:?}s")]
    RateLimitExceeded { retry_after: Option<u64> },

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Transient for GenAiError {
    /// Transient failures are worth a backoff-and-retry: the same request may
    /// succeed on a later attempt. Rejected or unauthenticated requests will
    /// not, so they propagate immediately.
    fn is_transient(&self) -> bool {
        match self {
            GenAiError::NetworkError(_)
            | GenAiError::Timeout
            | GenAiError::RateLimitExceeded { .. }
            | GenAiError::SerializationError(_) => true,
            GenAiError::ApiError { status, .. } => *status >= 500,
            GenAiError::AuthenticationError(_) | GenAiError::InvalidRequest(_) => false,
        }
    }
}

impl From<GenAiError> for StylistError {
    fn from(e: GenAiError) -> Self {
        StylistError::Upstream(e)
    }
}
