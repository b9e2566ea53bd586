//! # missive
//!
//! Building blocks for sending HTML newsletters outside the web application
//! that produced them.
//!
//! ## Features
//!
//! - Order newsletter sections by category, then by order within a category
//! - Make relative image, link, form, stylesheet and script URLs absolute
//! - Move secured resources onto a public mirror host for mail clients
//! - Escaping, URL and download-header helpers for newsletter templates
//!
//! ## Quick Start
//!
//! ```
//! use missive::{order_sections, rewrite_urls, rewrite_img_urls, NewsletterSection};
//!
//! let sections = order_sections(vec![
//!     NewsletterSection::new(1, 2, 1),
//!     NewsletterSection::new(2, 1, 5),
//!     NewsletterSection::new(3, 1, 2),
//! ]);
//! assert_eq!(sections.iter().map(|s| s.id).collect::<Vec<_>>(), [3, 2, 1]);
//!
//! let html = rewrite_urls(r#"<img src="/secure/img/pic.jpg">"#, "https://news.example.org/app").unwrap();
//! assert_eq!(html, r#"<img src="https://news.example.org/secure/img/pic.jpg">"#);
//!
//! let html = rewrite_img_urls(
//!     &html,
//!     "https://news.example.org/app",
//!     "https://public.example.org",
//!     "/secure/img",
//!     "pubimg",
//! )
//! .unwrap();
//! assert_eq!(html, r#"<img src="https://public.example.org/pubimg/pic.jpg">"#);
//! ```
//!
//! ## Pipelines from configuration
//!
//! ```
//! use missive::{Config, Rewriter};
//!
//! let config = Config::from_toml_str(r#"
//! base_url = "https://news.example.org/app/"
//!
//! [unsecured]
//! base_url = "https://public.example.org"
//! folder_path = "/app/secure"
//! folder = "pub"
//! "#).unwrap();
//!
//! let rewriter = Rewriter::from_config(&config).unwrap();
//! assert_eq!(
//!     rewriter.rewrite(r#"<a href="secure/flyer.pdf">flyer</a>"#),
//!     r#"<a href="https://public.example.org/pub/flyer.pdf">flyer</a>"#
//! );
//! ```

pub mod config;
pub mod error;
pub mod escape;
pub mod http;
pub mod pipeline;
pub mod rewrite;
pub mod section;
pub mod template;
mod util;

pub use config::{Config, UnsecuredConfig};
pub use error::{Error, Result};
pub use pipeline::Rewriter;
pub use rewrite::{
    BaseUrl, ElementKind, HtmlDocument, UnsecuredMirror, absolutize_urls, mirror_to_unsecured,
    rewrite_img_urls, rewrite_urls,
};
pub use section::{NewsletterSection, compare, order_sections};
pub use util::decode_text;
