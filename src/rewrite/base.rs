//! Base URL handling and reference classification.
//!
//! Relative references are resolved textually rather than through
//! [`Url::join`], so the path, query and fragment of a rewritten value keep
//! their original bytes (no percent-encoding or normalisation beyond dot
//! segment removal).

use url::Url;

use crate::error::{Error, Result};

/// How a raw attribute value should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// Empty or whitespace-only value.
    Empty,
    /// Has a scheme: `http:`, `https:`, `mailto:`, `javascript:`, `data:`...
    Absolute,
    /// Protocol-relative: `//cdn.example.org/x.js`
    NetworkPath,
    /// Fragment-only: `#top`
    Fragment,
    /// Starts with an entity such as `&quot;`; too ambiguous to touch.
    Encoded,
    /// Anything else, resolved against the base URL.
    Relative,
}

impl Reference {
    pub fn classify(value: &str) -> Self {
        let value = value.trim_ascii();
        if value.is_empty() {
            Reference::Empty
        } else if value.starts_with('#') {
            Reference::Fragment
        } else if is_network_path(value) {
            Reference::NetworkPath
        } else if value.starts_with('&') {
            Reference::Encoded
        } else if has_scheme(value) {
            Reference::Absolute
        } else {
            Reference::Relative
        }
    }

    pub fn is_relative(self) -> bool {
        self == Reference::Relative
    }
}

/// Browsers read `\` as `/` in http(s) URLs.
fn is_slash(b: u8) -> bool {
    b == b'/' || b == b'\\'
}

/// `//host...`, with either slash.
fn is_network_path(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 2 && is_slash(bytes[0]) && is_slash(bytes[1])
}

/// Turn every `\` of a path into `/`.
pub(crate) fn normalize_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// `scheme ":"` where scheme is `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn has_scheme(value: &str) -> bool {
    let bytes = value.as_bytes();
    if !bytes.first().is_some_and(u8::is_ascii_alphabetic) {
        return false;
    }

    for &b in &bytes[1..] {
        match b {
            b':' => return true,
            b if b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.' => {}
            _ => return false,
        }
    }

    false
}

/// Split a reference into its path and its `?query#fragment` suffix.
pub(crate) fn split_suffix(reference: &str) -> (&str, &str) {
    match reference.find(['?', '#']) {
        Some(idx) => reference.split_at(idx),
        None => (reference, ""),
    }
}

/// Remove `.` and `..` segments from an absolute path.
///
/// `..` at the root stays at the root.
pub(crate) fn remove_dot_segments(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    let mut output: Vec<&str> = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate().skip(1) {
        match *segment {
            "." => {
                if i == last {
                    output.push("");
                }
            }
            ".." => {
                output.pop();
                if i == last {
                    output.push("");
                }
            }
            other => output.push(other),
        }
    }

    let mut result = String::with_capacity(path.len() + 1);
    result.push('/');
    result.push_str(&output.join("/"));
    result
}

/// A validated base URL that relative references are resolved against.
///
/// The base path always acts as a directory: `https://host/app` and
/// `https://host/app/` both resolve `img/a.png` to `https://host/app/img/a.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    url: Url,
    origin: String,
    directory: String,
}

impl BaseUrl {
    /// Parse and validate a base URL.
    ///
    /// Fails when the URL does not parse or has no host.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::MissingConfig("base_url"));
        }

        let url = Url::parse(trimmed).map_err(|source| Error::InvalidBaseUrl {
            url: trimmed.to_string(),
            source,
        })?;

        if url.cannot_be_a_base() || url.host().is_none() {
            return Err(Error::NotHierarchical(trimmed.to_string()));
        }

        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(Error::NotHierarchical(trimmed.to_string()));
        }
        let origin = origin.ascii_serialization();

        let mut directory = url.path().to_string();
        if !directory.starts_with('/') {
            directory.insert(0, '/');
        }
        if !directory.ends_with('/') {
            directory.push('/');
        }

        Ok(Self {
            url,
            origin,
            directory,
        })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// `scheme://host[:port]`, without a trailing slash.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Directory path relative references resolve against, with a trailing slash.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Resolve a relative reference to its absolute path and raw suffix.
    pub(crate) fn resolve_path<'a>(&self, reference: &'a str) -> (String, &'a str) {
        let (path, suffix) = split_suffix(reference);
        let path = normalize_slashes(path);

        let joined = if path.starts_with('/') {
            remove_dot_segments(&path)
        } else {
            let mut joined = String::with_capacity(self.directory.len() + path.len());
            joined.push_str(&self.directory);
            joined.push_str(&path);
            remove_dot_segments(&joined)
        };

        (joined, suffix)
    }

    /// Resolve a relative reference to an absolute URL.
    ///
    /// The query and fragment are copied byte-for-byte.
    pub fn resolve(&self, reference: &str) -> String {
        let (path, suffix) = self.resolve_path(reference);
        let mut result = String::with_capacity(self.origin.len() + path.len() + suffix.len());
        result.push_str(&self.origin);
        result.push_str(&path);
        result.push_str(suffix);
        result
    }

    /// For an absolute or protocol-relative URL on this base's origin, return
    /// the raw `path?query#fragment` part. `None` for any other origin.
    pub(crate) fn same_origin_remainder<'a>(&self, value: &'a str) -> Option<&'a str> {
        let network_path = is_network_path(value);
        let candidate = if network_path {
            Url::parse(&format!("{}:{}", self.url.scheme(), value)).ok()?
        } else {
            Url::parse(value).ok()?
        };

        if candidate.origin() != self.url.origin() {
            return None;
        }

        let authority = if network_path {
            value
        } else {
            &value[value.find(':')? + 1..]
        };
        let after_scheme = authority.trim_start_matches(['/', '\\']);
        let rest = match after_scheme.find(['/', '\\', '?', '#']) {
            Some(idx) => &after_scheme[idx..],
            None => "",
        };
        Some(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Reference::classify("https://x.org/a"), Reference::Absolute);
        assert_eq!(Reference::classify("HTTP://x.org"), Reference::Absolute);
        assert_eq!(Reference::classify("mailto:a@b.org"), Reference::Absolute);
        assert_eq!(Reference::classify("javascript:void(0)"), Reference::Absolute);
        assert_eq!(Reference::classify("data:image/png;base64,AA"), Reference::Absolute);
        assert_eq!(Reference::classify("//cdn.x.org/a.js"), Reference::NetworkPath);
        assert_eq!(Reference::classify("\\\\cdn.x.org\\a.js"), Reference::NetworkPath);
        assert_eq!(Reference::classify("/\\cdn.x.org/a.js"), Reference::NetworkPath);
        assert_eq!(Reference::classify("#top"), Reference::Fragment);
        assert_eq!(Reference::classify(" \t\n"), Reference::Empty);
        // Only ASCII whitespace is insignificant.
        assert_eq!(Reference::classify("\u{a0}"), Reference::Relative);
        assert_eq!(Reference::classify("\u{a0}https://x.org/a"), Reference::Relative);
        assert_eq!(Reference::classify("&quot;a.png&quot;"), Reference::Encoded);
        assert_eq!(Reference::classify("images/a.png"), Reference::Relative);
        assert_eq!(Reference::classify("/images/a.png"), Reference::Relative);
        assert_eq!(Reference::classify("a.png?x=http://y"), Reference::Relative);
        assert_eq!(Reference::classify("?page=2"), Reference::Relative);
    }

    #[test]
    fn test_remove_dot_segments() {
        assert_eq!(remove_dot_segments("/a/b/c.png"), "/a/b/c.png");
        assert_eq!(remove_dot_segments("/a/./b/../c.png"), "/a/c.png");
        assert_eq!(remove_dot_segments("/a/b/.."), "/a/");
        assert_eq!(remove_dot_segments("/a/b/."), "/a/b/");
        assert_eq!(remove_dot_segments("/../../x"), "/x");
        assert_eq!(remove_dot_segments("/"), "/");
        assert_eq!(remove_dot_segments("/a//b"), "/a//b");
    }

    #[test]
    fn test_parse_rejects_bad_urls() {
        assert!(matches!(
            BaseUrl::parse("not a url"),
            Err(Error::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            BaseUrl::parse("mailto:news@example.org"),
            Err(Error::NotHierarchical(_))
        ));
        assert!(matches!(BaseUrl::parse(""), Err(Error::MissingConfig(_))));
    }

    #[test]
    fn test_directory_always_ends_with_slash() {
        let base = BaseUrl::parse("https://news.example.org/app").unwrap();
        assert_eq!(base.origin(), "https://news.example.org");
        assert_eq!(base.directory(), "/app/");

        let base = BaseUrl::parse("https://news.example.org").unwrap();
        assert_eq!(base.directory(), "/");

        let base = BaseUrl::parse("http://localhost:8080/lutece/").unwrap();
        assert_eq!(base.origin(), "http://localhost:8080");
        assert_eq!(base.directory(), "/lutece/");
    }

    #[test]
    fn test_resolve() {
        let base = BaseUrl::parse("https://news.example.org/app/").unwrap();
        assert_eq!(
            base.resolve("/images/a.png"),
            "https://news.example.org/images/a.png"
        );
        assert_eq!(
            base.resolve("images/a.png"),
            "https://news.example.org/app/images/a.png"
        );
        assert_eq!(
            base.resolve("../up.css"),
            "https://news.example.org/up.css"
        );
        assert_eq!(
            base.resolve("../../../above.css"),
            "https://news.example.org/above.css"
        );
        assert_eq!(
            base.resolve("jsp/site/Portal.jsp?page=news&id=3#top"),
            "https://news.example.org/app/jsp/site/Portal.jsp?page=news&id=3#top"
        );
        assert_eq!(
            base.resolve("?page=2"),
            "https://news.example.org/app/?page=2"
        );
    }

    #[test]
    fn test_resolve_backslashes_as_slashes() {
        let base = BaseUrl::parse("https://news.example.org/app/").unwrap();
        assert_eq!(
            base.resolve("\\images\\a.png"),
            "https://news.example.org/images/a.png"
        );
        assert_eq!(
            base.resolve("img\\..\\b.png"),
            "https://news.example.org/app/b.png"
        );
        assert_eq!(
            base.resolve("a.png?path=c:\\x"),
            "https://news.example.org/app/a.png?path=c:\\x"
        );
    }

    #[test]
    fn test_resolve_keeps_suffix_bytes() {
        let base = BaseUrl::parse("https://news.example.org/").unwrap();
        assert_eq!(
            base.resolve("a b.png?q=x y/../z#f/./g"),
            "https://news.example.org/a b.png?q=x y/../z#f/./g"
        );
    }

    #[test]
    fn test_same_origin_remainder() {
        let base = BaseUrl::parse("https://news.example.org/app").unwrap();
        assert_eq!(
            base.same_origin_remainder("https://news.example.org/secure/a.jpg?x=1"),
            Some("/secure/a.jpg?x=1")
        );
        assert_eq!(
            base.same_origin_remainder("HTTPS://NEWS.example.org:443/secure/a.jpg"),
            Some("/secure/a.jpg")
        );
        assert_eq!(
            base.same_origin_remainder("//news.example.org/secure/a.jpg"),
            Some("/secure/a.jpg")
        );
        assert_eq!(
            base.same_origin_remainder("https:\\\\news.example.org\\secure\\a.jpg"),
            Some("\\secure\\a.jpg")
        );
        assert_eq!(
            base.same_origin_remainder("\\\\news.example.org\\secure\\a.jpg"),
            Some("\\secure\\a.jpg")
        );
        assert_eq!(base.same_origin_remainder("https://news.example.org"), Some(""));
        assert_eq!(base.same_origin_remainder("http://news.example.org/a"), None);
        assert_eq!(base.same_origin_remainder("https://other.org/a"), None);
        assert_eq!(base.same_origin_remainder("mailto:a@news.example.org"), None);
    }
}
