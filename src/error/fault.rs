use serde::{Deserialize, Serialize};

/// Response classification for a pipeline failure.
///
/// Lower components raise narrow [`StylistError`](super::StylistError)
/// variants; the orchestrator and the HTTP boundary are the only places that
/// look at the fault class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fault {
    /// The caller supplied bad input (undecodable image, missing field).
    ClientInput,
    /// The generation service failed after the retry budget was spent.
    UpstreamFailure,
    /// The generation service answered, but violated its output contract.
    ContractViolation,
    /// A selected identifier does not resolve to stored content.
    ResourceMissing,
    /// Any uncaught condition; surfaced generically.
    Internal,
}
