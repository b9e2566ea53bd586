//! Pure string escaping helpers for newsletter templates.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Bytes left alone by form encoding: alphanumerics plus `.`, `-`, `*`, `_`.
/// Space is handled separately and becomes `+`.
const FORM_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'*')
    .remove(b'_');

/// Escape a string for use inside a JavaScript string literal.
///
/// `None` yields an empty string. Escapes backslashes, single and double
/// quotes, and turns CRLF into `\r` and LF into `\n`.
///
/// # Examples
///
/// ```
/// use missive::escape::convert_for_javascript;
///
/// assert_eq!(convert_for_javascript(Some("it's")), "it\\'s");
/// assert_eq!(convert_for_javascript(Some("a\r\nb")), "a\\rb");
/// assert_eq!(convert_for_javascript(None), "");
/// ```
pub fn convert_for_javascript(input: Option<&str>) -> String {
    let Some(input) = input else {
        return String::new();
    };

    let mut result = String::with_capacity(input.len() + input.len() / 8);
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                result.push_str("\\r");
            }
            '\n' => result.push_str("\\n"),
            _ => result.push(c),
        }
    }

    result
}

/// Encode a value for a URL query parameter, form style.
///
/// Space becomes `+`; everything outside `A-Z a-z 0-9 . - * _` is
/// percent-encoded as UTF-8.
///
/// # Examples
///
/// ```
/// use missive::escape::encode_for_url;
///
/// assert_eq!(encode_for_url("a b&c"), "a+b%26c");
/// assert_eq!(encode_for_url("été"), "%C3%A9t%C3%A9");
/// ```
pub fn encode_for_url(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for (i, part) in value.split(' ').enumerate() {
        if i > 0 {
            result.push('+');
        }
        result.extend(utf8_percent_encode(part, FORM_ENCODE));
    }
    result
}
