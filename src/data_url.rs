//! Base64 text transport with an optional `data:` URL prefix.
//!
//! Text payloads look like `data:<mime>;base64,<payload>` or just
//! `<payload>`. The payload is standard (padded) base64.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Start of a data URL.
pub const BASE64_URL_PREFIX: &str = "data:";
/// Separator between the MIME type and the payload.
pub const BASE64_MIDDLE_PREFIX: &str = ";base64,";

#[derive(Error, Debug)]
pub enum DataUrlError {
    #[error("Text has no 'data:' prefix")]
    MissingPrefix,
    #[error("Data URL prefix has no ';base64,' separator")]
    MalformedPrefix,
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Strip a `data:<mime>;base64,` prefix if present.
///
/// Text without the `data:` prefix (or without a `;base64,` separator) is
/// returned as is.
pub fn trim_base64_header(text: &str) -> &str {
    if !text.starts_with(BASE64_URL_PREFIX) {
        return text;
    }
    match text.find(BASE64_MIDDLE_PREFIX) {
        Some(idx) => &text[idx + BASE64_MIDDLE_PREFIX.len()..],
        None => text,
    }
}

/// The MIME type declared by a `data:<mime>;base64,` prefix.
pub fn mime_type_from_header(text: &str) -> Result<&str, DataUrlError> {
    let rest = text
        .strip_prefix(BASE64_URL_PREFIX)
        .ok_or(DataUrlError::MissingPrefix)?;
    let end = rest
        .find(BASE64_MIDDLE_PREFIX)
        .ok_or(DataUrlError::MalformedPrefix)?;
    Ok(&rest[..end])
}

/// `data:<mime>;base64,`
pub fn full_base64_prefix(mime_type: &str) -> String {
    format!("{BASE64_URL_PREFIX}{mime_type}{BASE64_MIDDLE_PREFIX}")
}

pub fn decode_base64(payload: &str) -> Result<Vec<u8>, DataUrlError> {
    // Line-wrapped payloads are common in pasted data
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
