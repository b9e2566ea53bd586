//! Input decoding.

use std::borrow::Cow;

/// Decode newsletter markup read from disk or stdin.
///
/// Tries UTF-8 first (a BOM is stripped), then falls back to Windows-1252,
/// which many older CMS exports use. Borrows when the input is valid UTF-8
/// without a BOM.
///
/// ```
/// use missive::decode_text;
///
/// assert_eq!(decode_text(b"<p>caf\xc3\xa9</p>"), "<p>café</p>");
/// assert_eq!(decode_text(b"<p>caf\xe9</p>"), "<p>café</p>");
/// ```
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    tracing::debug!("input is not valid UTF-8, decoding as windows-1252");
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}
