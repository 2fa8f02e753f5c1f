//! Transcoding between binary, hex, and base64 payload representations.
//!
//! The storage fanout expects hex text while the key-release network hands
//! back fresh ciphertext as base64, so payloads are normalized to hex before
//! they are stored or submitted for decryption.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::{VaultError, VaultResult};

/// Hex-encode a byte sequence: two lowercase digits per byte, output
/// length exactly twice the input length. Total function.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Strict inverse of [`bytes_to_hex`]. Errors on odd length or non-hex
/// characters.
pub fn hex_to_bytes(s: &str) -> VaultResult<Vec<u8>> {
    hex::decode(s).map_err(|e| VaultError::Serialization(format!("invalid hex: {e}")))
}

/// Base64-encode a byte sequence (standard alphabet, padded) for
/// transport to the key-release network.
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Strict base64 decoding for payloads received off the wire.
pub fn base64_to_bytes(s: &str) -> VaultResult<Vec<u8>> {
    BASE64
        .decode(s)
        .map_err(|e| VaultError::Serialization(format!("invalid base64: {e}")))
}

/// Whether a string already reads as hex: non-empty, even length, all
/// characters hex digits (either case).
pub fn looks_like_hex(s: &str) -> bool {
    !s.is_empty() && s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Normalize a base64 payload to hex.
///
/// Strips ASCII whitespace and a data-URI prefix (everything through the
/// first `,`) when present. A string that already reads as hex is returned
/// unchanged so already-normalized payloads are never double-processed.
/// When the input cannot be decoded as base64 the original input is
/// returned unchanged; the result is best-effort and any malformed value
/// is left for downstream to reject.
pub fn base64_to_hex(input: &str) -> String {
    let trimmed: String = input.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    // Data URIs carry the payload after the first comma.
    let payload = match trimmed.split_once(',') {
        Some((_, rest)) => rest,
        None => trimmed.as_str(),
    };

    if looks_like_hex(payload) {
        return payload.to_string();
    }

    match BASE64.decode(payload) {
        Ok(bytes) => hex::encode(bytes),
        Err(_) => input.to_string(),
    }
}
