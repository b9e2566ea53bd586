//! URL rewriting for newsletter HTML.
//!
//! Two policies, applied one element kind per pass:
//!
//! - **Absolutize**: relative URLs become absolute against a base URL, so the
//!   newsletter renders outside the web application (e.g. in a mail client).
//! - **Unsecured mirror**: URLs pointing into a secured folder of the base
//!   host move to a public mirror host and folder.
//!
//! Passes are cumulative. Each operates on the output of the previous one,
//! and absolute URLs are never touched again, so running a pass twice is a
//! no-op.
//!
//! ```
//! use missive::rewrite::{absolutize_urls, ElementKind};
//!
//! let html = r#"<img src="/images/a.png">"#;
//! let out = absolutize_urls(html, "https://news.example.org/app", &ElementKind::ALL).unwrap();
//! assert_eq!(out, r#"<img src="https://news.example.org/images/a.png">"#);
//! ```

mod base;
mod css;
mod kind;
mod mirror;
mod scan;

pub use base::{BaseUrl, Reference};
pub use kind::ElementKind;
pub use mirror::UnsecuredMirror;

use crate::error::Result;

/// An HTML fragment being rewritten against a base URL.
///
/// Holds no state beyond the text itself; build one per fragment and take
/// the result with [`HtmlDocument::into_content`].
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    content: String,
    base: BaseUrl,
}

impl HtmlDocument {
    pub fn new(content: impl Into<String>, base: BaseUrl) -> Self {
        Self {
            content: content.into(),
            base,
        }
    }

    /// Parse `base_url` and wrap `content`.
    pub fn parse(content: impl Into<String>, base_url: &str) -> Result<Self> {
        Ok(Self::new(content, BaseUrl::parse(base_url)?))
    }

    pub fn base(&self) -> &BaseUrl {
        &self.base
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }

    /// Make every relative URL of `kind` absolute. Returns how many changed.
    pub fn convert_all_relative_urls(&mut self, kind: ElementKind) -> usize {
        if self.content.is_empty() {
            return 0;
        }

        let base = &self.base;
        let (rewritten, count) = scan::rewrite_markup(&self.content, kind, |value| {
            match Reference::classify(value) {
                Reference::Relative => Some(base.resolve(value)),
                other => {
                    tracing::trace!(%kind, value, reference = ?other, "left as is");
                    None
                }
            }
        });

        tracing::debug!(%kind, count, "absolutized urls");
        if count > 0 {
            self.content = rewritten;
        }
        count
    }

    /// Move URLs of `kind` that point into the mirror's secured folder onto
    /// the mirror host. Returns how many changed.
    pub fn convert_urls_to_unsecured_urls(
        &mut self,
        kind: ElementKind,
        mirror: &UnsecuredMirror,
    ) -> usize {
        if self.content.is_empty() {
            return 0;
        }

        let base = &self.base;
        let (rewritten, count) = scan::rewrite_markup(&self.content, kind, |value| {
            let redirected = mirror.redirect(base, value);
            if redirected.is_none() {
                tracing::trace!(%kind, value, "outside mirrored folder");
            }
            redirected
        });

        tracing::debug!(%kind, count, mirror = mirror.base_url(), "mirrored urls");
        if count > 0 {
            self.content = rewritten;
        }
        count
    }
}

/// Make relative URLs absolute for each kind in `kinds`, in order.
///
/// Empty input yields an empty string without validating `base_url`.
pub fn absolutize_urls(html: &str, base_url: &str, kinds: &[ElementKind]) -> Result<String> {
    if html.is_empty() {
        return Ok(String::new());
    }

    let mut doc = HtmlDocument::parse(html, base_url)?;
    for &kind in kinds {
        doc.convert_all_relative_urls(kind);
    }
    Ok(doc.into_content())
}

/// Redirect URLs under `unsecured_folder_path` to the unsecured mirror for
/// each kind in `kinds`, in order.
///
/// All parameters are validated before the first pass.
pub fn mirror_to_unsecured(
    html: &str,
    base_url: &str,
    unsecured_base_url: &str,
    unsecured_folder_path: &str,
    unsecured_folder: &str,
    kinds: &[ElementKind],
) -> Result<String> {
    if html.is_empty() {
        return Ok(String::new());
    }

    let mirror = UnsecuredMirror::new(unsecured_base_url, unsecured_folder_path, unsecured_folder)?;
    let mut doc = HtmlDocument::parse(html, base_url)?;
    for &kind in kinds {
        doc.convert_urls_to_unsecured_urls(kind, &mirror);
    }
    Ok(doc.into_content())
}

/// Absolutize images, links, forms, stylesheets and scripts.
pub fn rewrite_urls(html: &str, base_url: &str) -> Result<String> {
    absolutize_urls(html, base_url, &ElementKind::ALL)
}

/// Move secured images and links onto the unsecured mirror.
pub fn rewrite_img_urls(
    html: &str,
    base_url: &str,
    unsecured_base_url: &str,
    unsecured_folder_path: &str,
    unsecured_folder: &str,
) -> Result<String> {
    mirror_to_unsecured(
        html,
        base_url,
        unsecured_base_url,
        unsecured_folder_path,
        unsecured_folder,
        &ElementKind::MIRRORED,
    )
}
