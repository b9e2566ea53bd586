//! `url(...)` location in CSS text using cssparser.
//!
//! Only the characters of each URL are replaced. Quotes, whitespace inside
//! the parentheses, comments and every other token keep their original bytes.

use std::ops::Range;

use cssparser::{ParseError, Parser, ParserInput, Token};

use super::scan::rewrite_value;

type CssParseError<'i> = ParseError<'i, ()>;

/// Rewrite every `url(...)` value in `css`.
///
/// Handles `url(a.png)`, `url('a.png')` and `url("a.png")`. Returns the new
/// text and the number of URLs replaced.
pub(crate) fn rewrite_css_urls<F>(css: &str, rewrite: &mut F) -> (String, usize)
where
    F: FnMut(&str) -> Option<String>,
{
    let spans = css_url_spans(css);
    if spans.is_empty() {
        return (css.to_string(), 0);
    }

    let mut output = String::with_capacity(css.len() + css.len() / 4);
    let mut count = 0;
    let mut pos = 0;

    for span in spans {
        if let Some(replacement) = rewrite_value(&css[span.clone()], rewrite) {
            output.push_str(&css[pos..span.start]);
            output.push_str(&replacement);
            pos = span.end;
            count += 1;
        }
    }

    output.push_str(&css[pos..]);
    (output, count)
}

/// Byte ranges of the URL text inside each `url(...)`, in source order.
pub(crate) fn css_url_spans(css: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    collect_url_spans(&mut parser, &mut spans);
    spans
}

fn collect_url_spans(parser: &mut Parser<'_, '_>, spans: &mut Vec<Range<usize>>) {
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::UnquotedUrl(_) => {
                let offset = start.byte_index();
                if let Some(inner) = unquoted_url_inner(parser.slice_from(start)) {
                    spans.push(offset + inner.start..offset + inner.end);
                }
            }
            Token::Function(ref name) if name.eq_ignore_ascii_case("url") => {
                let _ = parser.parse_nested_block(|p| {
                    loop {
                        let string_start = p.position();
                        let quoted = match p.next_including_whitespace() {
                            Ok(Token::WhiteSpace(_)) => continue,
                            Ok(Token::QuotedString(_)) => true,
                            _ => false,
                        };
                        if quoted {
                            let raw = p.slice_from(string_start);
                            let bytes = raw.as_bytes();
                            // Unterminated strings at EOF have no closing quote.
                            if bytes.len() >= 2 && bytes[0] == bytes[bytes.len() - 1] {
                                let offset = string_start.byte_index();
                                spans.push(offset + 1..offset + raw.len() - 1);
                            }
                        }
                        break;
                    }
                    Ok::<_, CssParseError>(())
                });
            }
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                let _ = parser.parse_nested_block(|p| {
                    collect_url_spans(p, spans);
                    Ok::<_, CssParseError>(())
                });
            }
            _ => {}
        }
    }
}

/// Range of the URL inside the raw text of an unquoted `url( ... )` token.
fn unquoted_url_inner(raw: &str) -> Option<Range<usize>> {
    let open = raw.find('(')? + 1;
    let close = if raw.ends_with(')') {
        raw.len() - 1
    } else {
        raw.len()
    };
    if close <= open {
        return None;
    }

    let inner = &raw[open..close];
    let leading = inner.len() - inner.trim_ascii_start().len();
    let trimmed = inner.trim_ascii();
    if trimmed.is_empty() {
        return None;
    }

    let start = open + leading;
    Some(start..start + trimmed.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans_text(css: &str) -> Vec<&str> {
        css_url_spans(css).into_iter().map(|r| &css[r]).collect()
    }

    #[test]
    fn test_locate_all_url_forms() {
        let css = r#"
            body { background: url('bg.png'); }
            .icon { background-image: url("icon.svg"); }
            .plain { background: URL( plain.gif ) no-repeat; }
        "#;
        assert_eq!(spans_text(css), vec!["bg.png", "icon.svg", "plain.gif"]);
    }

    #[test]
    fn test_urls_in_nested_blocks() {
        let css = "@media print { .a { background: url(print.png) } }";
        assert_eq!(spans_text(css), vec!["print.png"]);
    }

    #[test]
    fn test_comments_and_strings_ignored() {
        let css = r#"/* url(old.png) */ .a { content: "url(x.png)"; }"#;
        assert!(css_url_spans(css).is_empty());
    }

    #[test]
    fn test_rewrite_keeps_quotes_and_spacing() {
        let css = r#"a{background:url( 'a.png' )} b{background:url(b.png)}"#;
        let (out, n) = rewrite_css_urls(css, &mut |u: &str| Some(format!("/x/{u}")));
        assert_eq!(n, 2);
        assert_eq!(out, r#"a{background:url( '/x/a.png' )} b{background:url(/x/b.png)}"#);
    }

    #[test]
    fn test_rewrite_none_leaves_text() {
        let css = "a{background:url(a.png)}";
        let (out, n) = rewrite_css_urls(css, &mut |_: &str| None);
        assert_eq!(n, 0);
        assert_eq!(out, css);
    }

    #[test]
    fn test_unquoted_url_inner() {
        assert_eq!(unquoted_url_inner("url(a.png)"), Some(4..9));
        assert_eq!(unquoted_url_inner("url(  a.png )"), Some(6..11));
        assert_eq!(unquoted_url_inner("url(a.png"), Some(4..9));
        assert_eq!(unquoted_url_inner("url()"), None);
    }
}
