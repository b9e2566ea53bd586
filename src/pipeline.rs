//! Newsletter body rewriting: absolutize, then optionally mirror.

use crate::config::Config;
use crate::error::Result;
use crate::rewrite::{BaseUrl, ElementKind, HtmlDocument, UnsecuredMirror};

/// A validated rewrite pipeline.
///
/// All configuration is checked when the rewriter is built, so
/// [`Rewriter::rewrite`] cannot fail halfway through a fragment.
#[derive(Debug, Clone)]
pub struct Rewriter {
    base: BaseUrl,
    kinds: Vec<ElementKind>,
    mirror: Option<UnsecuredMirror>,
}

impl Rewriter {
    /// Absolutize every element kind against `base`, without a mirror.
    pub fn new(base: BaseUrl) -> Self {
        Self {
            base,
            kinds: ElementKind::ALL.to_vec(),
            mirror: None,
        }
    }

    pub fn with_kinds(mut self, kinds: impl Into<Vec<ElementKind>>) -> Self {
        self.kinds = kinds.into();
        self
    }

    pub fn with_mirror(mut self, mirror: UnsecuredMirror) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let base = BaseUrl::parse(&config.base_url)?;
        let mirror = config
            .unsecured
            .as_ref()
            .map(|u| UnsecuredMirror::new(&u.base_url, &u.folder_path, &u.folder))
            .transpose()?;

        Ok(Self {
            base,
            kinds: config.kinds.clone(),
            mirror,
        })
    }

    pub fn base(&self) -> &BaseUrl {
        &self.base
    }

    pub fn mirror(&self) -> Option<&UnsecuredMirror> {
        self.mirror.as_ref()
    }

    /// Rewrite one fragment.
    pub fn rewrite(&self, html: &str) -> String {
        if html.is_empty() {
            return String::new();
        }

        let mut doc = HtmlDocument::new(html, self.base.clone());
        let absolutized: usize = self
            .kinds
            .iter()
            .map(|&kind| doc.convert_all_relative_urls(kind))
            .sum();

        let mirrored: usize = match &self.mirror {
            Some(mirror) => ElementKind::MIRRORED
                .iter()
                .map(|&kind| doc.convert_urls_to_unsecured_urls(kind, mirror))
                .sum(),
            None => 0,
        };

        tracing::debug!(absolutized, mirrored, "rewrote fragment");
        doc.into_content()
    }
}
