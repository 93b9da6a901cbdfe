//! Hex codec for file identifiers and key material.
//!
//! Encoding is lowercase, two characters per byte. Decoding accepts either
//! case and tolerates PDF hex-string delimiters (`<...>`) and whitespace.

use crate::error::{Error, Result};

/// Encode bytes as lowercase hex.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex text, stripping `<` `>` delimiters if present.
///
/// Fails with [`Error::Format`] on odd-length input or non-hex digits.
pub fn hex_to_bytes(text: &str) -> Result<Vec<u8>> {
    let trimmed = text.trim();
    let inner = trimmed.strip_prefix('<').unwrap_or(trimmed);
    let inner = inner.strip_suffix('>').unwrap_or(inner);

    let digits: String = inner.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    hex::decode(&digits).map_err(|e| Error::Format(format!("invalid hex string '{}': {}", text, e)))
}
