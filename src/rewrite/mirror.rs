//! Redirection of a secured resource folder to a public mirror host.
//!
//! Some delivery channels cannot fetch resources behind the authenticated
//! host. Only URLs under the configured folder are redirected; every other
//! URL is left as it is.

use super::base::{BaseUrl, Reference, normalize_slashes, remove_dot_segments, split_suffix};
use crate::error::{Error, Result};

/// Where eligible resources are moved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsecuredMirror {
    base_url: String,
    folder_path: String,
    folder: String,
}

impl UnsecuredMirror {
    /// Build a mirror rule.
    ///
    /// * `base_url` - destination host, e.g. `https://public.example.org`
    /// * `folder_path` - source folder prefix on the secured host, e.g. `/secure/img`
    /// * `folder` - destination folder name, e.g. `pubimg`
    pub fn new(base_url: &str, folder_path: &str, folder: &str) -> Result<Self> {
        // Validated only; output uses the raw text.
        BaseUrl::parse(base_url)?;

        let folder_path = folder_path.trim().trim_matches('/');
        if folder_path.is_empty() {
            return Err(Error::MissingConfig("unsecured.folder_path"));
        }

        let folder = folder.trim().trim_matches('/');
        if folder.is_empty() {
            return Err(Error::MissingConfig("unsecured.folder"));
        }

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            folder_path: format!("/{folder_path}"),
            folder: folder.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Source folder prefix, with a leading and no trailing slash.
    pub fn folder_path(&self) -> &str {
        &self.folder_path
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// The part of `path` after the folder prefix, if `path` is inside it.
    fn strip_folder<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.folder_path.as_str())?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }

    /// Rewrite `value` onto the mirror when it points inside the secured folder
    /// of `base`'s host. `None` leaves the value untouched.
    pub fn redirect(&self, base: &BaseUrl, value: &str) -> Option<String> {
        let (path, suffix): (String, &str) = match Reference::classify(value) {
            Reference::Relative => base.resolve_path(value),
            Reference::Absolute | Reference::NetworkPath => {
                let rest = base.same_origin_remainder(value)?;
                let (path, suffix) = split_suffix(rest);
                if path.is_empty() {
                    return None;
                }
                (remove_dot_segments(&normalize_slashes(path)), suffix)
            }
            _ => return None,
        };

        let remainder = self.strip_folder(&path)?;

        let mut result = String::with_capacity(
            self.base_url.len() + self.folder.len() + remainder.len() + suffix.len() + 1,
        );
        result.push_str(&self.base_url);
        result.push('/');
        result.push_str(&self.folder);
        result.push_str(remainder);
        result.push_str(suffix);
        Some(result)
    }
}
