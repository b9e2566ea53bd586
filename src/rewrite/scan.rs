//! Single-pass tag scanner that rewrites attribute values in raw markup.
//!
//! The scanner never builds a tree. It walks `<...>` tags with memchr, reads
//! their attributes, and splices replacement values into a copy of the input.
//! Every byte outside a replaced value is copied as-is, so malformed markup
//! passes through untouched.

use std::ops::Range;

use bstr::ByteSlice;
use memchr::memmem;

use super::css::rewrite_css_urls;
use super::kind::ElementKind;

/// Bytes that terminate a tag or attribute name.
const NAME_END: &[u8] = b" \t\r\n\x0c/>=";

/// How an attribute value was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quote {
    Double,
    Single,
    None,
}

/// One attribute inside a start tag. Offsets are absolute into the markup.
#[derive(Debug, Clone)]
pub(crate) struct Attribute {
    pub name: Range<usize>,
    pub value: Option<Range<usize>>,
    pub quote: Quote,
}

/// A parsed start tag.
#[derive(Debug)]
pub(crate) struct StartTag {
    pub name: Range<usize>,
    /// Offset just past the closing `>`.
    pub end: usize,
    pub self_closing: bool,
    pub attributes: Vec<Attribute>,
}

enum TagScan {
    Tag(StartTag),
    /// Not a start tag (`</a>`, `<!DOCTYPE>`, a stray `<` in text).
    NotATag,
    /// The tag never closes; the rest of the input is copied unchanged.
    Unterminated,
}

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x0c')
}

/// Find the `>` that closes the tag opened at `from`, skipping attribute
/// values. Agrees with [`scan_attributes`] on where each value ends.
fn find_tag_close(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    let mut unquoted = false;
    let mut after_eq = false;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        if unquoted {
            if b == b'>' {
                return Some(i);
            }
            unquoted = !is_space(b);
            continue;
        }
        match b {
            b'>' => return Some(i),
            _ if is_space(b) => {}
            b'"' | b'\'' if after_eq => {
                quote = Some(b);
                after_eq = false;
            }
            _ if after_eq => {
                unquoted = true;
                after_eq = false;
            }
            b'=' => after_eq = true,
            _ => {}
        }
    }
    None
}

fn scan_tag(bytes: &[u8], start: usize) -> TagScan {
    let name_start = start + 1;
    if !bytes.get(name_start).is_some_and(u8::is_ascii_alphabetic) {
        return TagScan::NotATag;
    }

    let name_end = bytes[name_start..]
        .find_byteset(NAME_END)
        .map_or(bytes.len(), |p| name_start + p);

    let Some(close) = find_tag_close(bytes, name_end) else {
        return TagScan::Unterminated;
    };

    let attributes = scan_attributes(bytes, name_end, close);
    let self_closing = close > name_end && bytes[close - 1] == b'/';

    TagScan::Tag(StartTag {
        name: name_start..name_end,
        end: close + 1,
        self_closing,
        attributes,
    })
}

fn scan_attributes(bytes: &[u8], from: usize, close: usize) -> Vec<Attribute> {
    let mut attributes = Vec::new();
    let mut i = from;

    while i < close {
        while i < close && (is_space(bytes[i]) || bytes[i] == b'/') {
            i += 1;
        }
        if i >= close {
            break;
        }

        let name_start = i;
        while i < close && !NAME_END.contains(&bytes[i]) {
            i += 1;
        }
        if i == name_start {
            // Stray `=`
            i += 1;
            continue;
        }
        let name = name_start..i;

        let mut j = i;
        while j < close && is_space(bytes[j]) {
            j += 1;
        }
        if j >= close || bytes[j] != b'=' {
            attributes.push(Attribute {
                name,
                value: None,
                quote: Quote::None,
            });
            continue;
        }

        j += 1;
        while j < close && is_space(bytes[j]) {
            j += 1;
        }

        let (value, quote, next) = match bytes.get(j) {
            Some(&q @ (b'"' | b'\'')) if j < close => {
                let value_start = j + 1;
                let value_end = memchr::memchr(q, &bytes[value_start..close])
                    .map_or(close, |p| value_start + p);
                let quote = if q == b'"' { Quote::Double } else { Quote::Single };
                (value_start..value_end, quote, (value_end + 1).min(close))
            }
            _ => {
                let value_end = bytes[j..close]
                    .iter()
                    .position(|&b| is_space(b))
                    .map_or(close, |p| j + p);
                (j..value_end, Quote::None, value_end)
            }
        };

        attributes.push(Attribute {
            name,
            value: Some(value),
            quote,
        });
        i = next;
    }

    attributes
}

/// Find `</name` (case-insensitive) at or after `from`.
fn find_end_tag(bytes: &[u8], from: usize, name: &[u8]) -> Option<usize> {
    let mut pos = from;
    while let Some(rel) = memmem::find(&bytes[pos..], b"</") {
        let at = pos + rel;
        let name_start = at + 2;
        let name_end = name_start + name.len();
        if bytes
            .get(name_start..name_end)
            .is_some_and(|n| n.eq_ignore_ascii_case(name))
            && !bytes.get(name_end).is_some_and(u8::is_ascii_alphanumeric)
        {
            return Some(at);
        }
        pos = name_start;
    }
    None
}

/// Apply `rewrite` to a raw value, keeping any whitespace around it.
pub(crate) fn rewrite_value<F>(raw: &str, rewrite: &mut F) -> Option<String>
where
    F: FnMut(&str) -> Option<String>,
{
    // HTML and URL parsers only strip ASCII whitespace.
    let trimmed = raw.trim_ascii();
    if trimmed.is_empty() {
        return None;
    }

    let leading = raw.len() - raw.trim_ascii_start().len();
    let replacement = rewrite(trimmed)?;
    if replacement == trimmed {
        return None;
    }

    let mut result = String::with_capacity(raw.len() + replacement.len());
    result.push_str(&raw[..leading]);
    result.push_str(&replacement);
    result.push_str(&raw[leading + trimmed.len()..]);
    Some(result)
}

/// Collects replacements for one tag.
struct Splices {
    edits: Vec<(Range<usize>, String)>,
}

impl Splices {
    fn apply(mut self, html: &str, range: Range<usize>, output: &mut String) -> usize {
        self.edits.sort_by_key(|(r, _)| r.start);
        let count = self.edits.len();
        let mut pos = range.start;
        for (span, replacement) in self.edits {
            output.push_str(&html[pos..span.start]);
            output.push_str(&replacement);
            pos = span.end;
        }
        output.push_str(&html[pos..range.end]);
        count
    }
}

/// Rewrite the URL values of one element kind in `html`.
///
/// `rewrite` receives each value with surrounding whitespace trimmed and
/// returns `Some` with the replacement, or `None` to leave it alone. Returns
/// the new markup and the number of values replaced.
pub(crate) fn rewrite_markup<F>(html: &str, kind: ElementKind, mut rewrite: F) -> (String, usize)
where
    F: FnMut(&str) -> Option<String>,
{
    let bytes = html.as_bytes();
    let mut output = String::with_capacity(html.len() + html.len() / 8);
    let mut count = 0;
    let mut pos = 0;

    while let Some(rel) = memchr::memchr(b'<', &bytes[pos..]) {
        let start = pos + rel;

        if bytes[start..].starts_with(b"<!--") {
            let body = start + 4;
            // `<!-->` and `<!--->` close immediately.
            let end = if bytes[body..].starts_with(b">") {
                body + 1
            } else if bytes[body..].starts_with(b"->") {
                body + 2
            } else {
                memmem::find(&bytes[body..], b"-->").map_or(bytes.len(), |p| body + p + 3)
            };
            output.push_str(&html[pos..end]);
            pos = end;
            continue;
        }

        let tag = match scan_tag(bytes, start) {
            TagScan::Tag(tag) => tag,
            TagScan::NotATag => {
                output.push_str(&html[pos..start + 1]);
                pos = start + 1;
                continue;
            }
            TagScan::Unterminated => break,
        };

        output.push_str(&html[pos..start]);

        let tag_name = &bytes[tag.name.clone()];
        let mut splices = Splices { edits: Vec::new() };

        if tag_name.eq_ignore_ascii_case(kind.tag_name()) {
            // Browsers honor the first occurrence, even when it has no value.
            let url_attr = tag
                .attributes
                .iter()
                .find(|a| bytes[a.name.clone()].eq_ignore_ascii_case(kind.url_attribute()));
            if let Some(span) = url_attr.and_then(|a| a.value.clone()) {
                if let Some(replacement) = rewrite_value(&html[span.clone()], &mut rewrite) {
                    splices.edits.push((span, replacement));
                }
            }
        }

        if kind.scans_stylesheets() {
            for attr in &tag.attributes {
                if !bytes[attr.name.clone()].eq_ignore_ascii_case(b"style") {
                    continue;
                }
                if let Some(span) = attr.value.clone() {
                    let (css, n) = rewrite_css_urls(&html[span.clone()], &mut rewrite);
                    if n > 0 {
                        splices.edits.push((span, css));
                    }
                }
            }
        }

        count += splices.apply(html, start..tag.end, &mut output);
        pos = tag.end;

        // Raw text bodies are never scanned for tags.
        let raw_text = if tag_name.eq_ignore_ascii_case(b"script") {
            Some(&b"script"[..])
        } else if tag_name.eq_ignore_ascii_case(b"style") {
            Some(&b"style"[..])
        } else {
            None
        };

        if let Some(name) = raw_text.filter(|_| !tag.self_closing) {
            let Some(body_end) = find_end_tag(bytes, pos, name) else {
                continue;
            };
            let body = &html[pos..body_end];
            if name == b"style" && kind.scans_stylesheets() {
                let (css, n) = rewrite_css_urls(body, &mut rewrite);
                output.push_str(&css);
                count += n;
            } else {
                output.push_str(body);
            }
            pos = body_end;
        }
    }

    output.push_str(&html[pos..]);
    (output, count)
}
