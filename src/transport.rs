//! Base64 transport codec for images.
//!
//! Inbound person images arrive either as bare base64 or prefixed with a
//! scheme/media-type header (`data:image/png;base64,AAAA...`). Outbound
//! images are always bare base64; any prefix is left to the caller.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::StylistError;

/// Decode a transport-encoded image into raw bytes.
///
/// Accepts an optional `<scheme>,` prefix before the payload. Whitespace in
/// the payload is ignored. An empty or undecodable payload is a client-input
/// error.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>, StylistError> {
    let payload = match encoded.split_once(',') {
        Some((_scheme, payload)) => payload,
        None => encoded,
    };
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(StylistError::InvalidInput("empty image payload".into()));
    }
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| StylistError::InvalidInput(format!("invalid base64 image: {e}")))?;
    if bytes.is_empty() {
        return Err(StylistError::InvalidInput("empty image payload".into()));
    }
    Ok(bytes)
}

/// Encode raw image bytes to bare base64 (no prefix).
pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Best-effort mime label from magic bytes. Falls back to JPEG, the closet's
/// dominant format.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}
