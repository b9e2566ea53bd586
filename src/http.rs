//! URL building and forced-download response headers.
//!
//! These helpers only produce strings and header pairs; applying them to a
//! real HTTP response is left to the caller.

use std::fmt;

/// A URL with query parameters appended in insertion order.
///
/// Values are appended as given; encode them with
/// [`encode_for_url`](crate::escape::encode_for_url) first when needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlItem {
    root: String,
    parameters: Vec<(String, String)>,
}

impl UrlItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            root: url.into(),
            parameters: Vec::new(),
        }
    }

    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.push((name.into(), value.into()));
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }
}

impl fmt::Display for UrlItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        let mut separator = if self.root.contains('?') { '&' } else { '?' };
        for (name, value) in &self.parameters {
            write!(f, "{separator}{name}={value}")?;
            separator = '&';
        }
        Ok(())
    }
}

/// Add one `name=value` pair per value, keeping their order.
pub fn add_parameters<I, S>(url: &mut UrlItem, name: &str, values: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for value in values {
        url.add_parameter(name, value);
    }
}

/// Content type used when the filename gives no better answer.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// MIME type for a filename, from its extension (case-insensitive).
pub fn mime_type_for(file_name: &str) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;
    let mime = match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "txt" => "text/plain",
        "xml" => "application/xml",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "doc" => "application/msword",
        "xls" => "application/vnd.ms-excel",
        "odt" => "application/vnd.oasis.opendocument.text",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        _ => return None,
    };
    Some(mime)
}

/// Response headers that force a download of `file_name`.
///
/// `.csv` exports are always served as `application/csv`. Any other type is
/// looked up from the filename, falling back to [`DEFAULT_CONTENT_TYPE`].
pub fn download_headers(file_name: &str, extension: &str) -> Vec<(&'static str, String)> {
    let content_type = if extension.eq_ignore_ascii_case(".csv") {
        "application/csv"
    } else {
        mime_type_for(file_name).unwrap_or(DEFAULT_CONTENT_TYPE)
    };

    vec![
        (
            "Content-Disposition",
            format!("attachment ;filename=\"{file_name}\""),
        ),
        ("Content-Type", content_type.to_string()),
        ("Pragma", "public".to_string()),
        ("Expires", "0".to_string()),
        (
            "Cache-Control",
            "must-revalidate,post-check=0,pre-check=0".to_string(),
        ),
    ]
}
