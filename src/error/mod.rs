//! Error types for the stylist pipeline.
//!
//! - [`StylistError`] — Errors raised by the selection/compositing pipeline.
//! - [`Fault`] — Response classification the HTTP boundary maps statuses from.

pub mod fault;
pub mod stylist_error;

pub use fault::Fault;
pub use stylist_error::StylistError;

/// Convenience alias for pipeline-level results.
pub type StylistResult<T> = Result<T, StylistError>;
