//! Byte/text conversions used when decoding proxy exports.

use crate::errors::ExportError;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// One character per byte, the way latin-1 maps them.
pub fn latin1_decode(bytes: &[u8]) -> String {
    return bytes.iter().map(|&b| b as char).collect();
}

pub fn latin1_encode(text: &str) -> Result<Vec<u8>, ExportError> {
    return text
        .chars()
        .map(|c| u8::try_from(c).map_err(|_| ExportError::NotLatin1(c)))
        .collect();
}

/// Standard alphabet decode. Whitespace inside the payload, as found in
/// wrapped export text, is ignored.
pub fn decode_standard_base64(data: &str) -> Result<Vec<u8>, ExportError> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    return Ok(STANDARD.decode(compact)?);
}

pub fn to_standard_base64(bytes: &[u8]) -> String {
    return STANDARD.encode(bytes);
}

/// Replaces `/` with `_` and `+` with `-`. Padding stays as it is.
pub fn url_safe_substitute(encoded: &str) -> String {
    return encoded.replace('/', "_").replace('+', "-");
}

pub fn url_safe_restore(encoded: &str) -> String {
    return encoded.replace('_', "/").replace('-', "+");
}
