//! Element kinds whose URL-bearing attributes the rewriter understands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A kind of element that carries a URL reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ElementKind {
    /// `<img src>`
    Img,
    /// `<a href>`
    A,
    /// `<form action>`
    Form,
    /// `<link href>` plus `url(...)` in `<style>` bodies and `style` attributes
    Css,
    /// `<script src>`
    Javascript,
}

impl ElementKind {
    /// Every kind, in the order a full absolutize pass applies them.
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Img,
        ElementKind::A,
        ElementKind::Form,
        ElementKind::Css,
        ElementKind::Javascript,
    ];

    /// Kinds redirected to the unsecured mirror by default.
    pub const MIRRORED: [ElementKind; 2] = [ElementKind::Img, ElementKind::A];

    /// Lowercase tag name of the element.
    pub fn tag_name(self) -> &'static [u8] {
        match self {
            ElementKind::Img => b"img",
            ElementKind::A => b"a",
            ElementKind::Form => b"form",
            ElementKind::Css => b"link",
            ElementKind::Javascript => b"script",
        }
    }

    /// Lowercase name of the attribute holding the URL.
    pub fn url_attribute(self) -> &'static [u8] {
        match self {
            ElementKind::Img | ElementKind::Javascript => b"src",
            ElementKind::A | ElementKind::Css => b"href",
            ElementKind::Form => b"action",
        }
    }

    /// Whether this kind also rewrites `url(...)` references in CSS text.
    pub fn scans_stylesheets(self) -> bool {
        self == ElementKind::Css
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Img => "img",
            ElementKind::A => "a",
            ElementKind::Form => "form",
            ElementKind::Css => "css",
            ElementKind::Javascript => "javascript",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "img" => Ok(ElementKind::Img),
            "a" => Ok(ElementKind::A),
            "form" => Ok(ElementKind::Form),
            "css" => Ok(ElementKind::Css),
            "javascript" | "js" => Ok(ElementKind::Javascript),
            _ => Err(Error::UnknownElementKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for ElementKind {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.as_str().to_string()
    }
}
