//! Rewrite configuration loaded from TOML.
//!
//! ```toml
//! base_url = "https://news.example.org/app/"
//! kinds = ["img", "a", "form", "css", "javascript"]
//! template_dir = "templates/newsletter"
//!
//! [unsecured]
//! base_url = "https://public.example.org"
//! folder_path = "/secure/img"
//! folder = "pubimg"
//!
//! [virtual_hosts]
//! intranet = "https://intra.example.org/"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rewrite::ElementKind;
use crate::template::html_template_path;

/// Unsecured mirror section (`[unsecured]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsecuredConfig {
    /// Public host that serves the mirrored folder.
    pub base_url: String,
    /// Folder on the secured host whose resources are mirrored.
    pub folder_path: String,
    /// Folder name on the public host.
    pub folder: String,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL that relative references resolve against.
    pub base_url: String,
    /// Kinds absolutized by the pipeline, in order.
    #[serde(default = "default_kinds")]
    pub kinds: Vec<ElementKind>,
    /// Directory holding newsletter templates.
    #[serde(default)]
    pub template_dir: Option<String>,
    /// When present, secured resources are moved to a public mirror.
    #[serde(default)]
    pub unsecured: Option<UnsecuredConfig>,
    /// Virtual host code to base URL.
    #[serde(default)]
    pub virtual_hosts: BTreeMap<String, String>,
}

fn default_kinds() -> Vec<ElementKind> {
    ElementKind::ALL.to_vec()
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            kinds: default_kinds(),
            template_dir: None,
            unsecured: None,
            virtual_hosts: BTreeMap::new(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&data)?;
        tracing::info!(
            path = %path.display(),
            base_url = %config.base_url,
            mirror = config.unsecured.is_some(),
            "loaded config"
        );
        Ok(config)
    }

    /// Base URL configured for a virtual host code.
    pub fn virtual_host_base_url(&self, code: &str) -> Option<&str> {
        self.virtual_hosts.get(code).map(String::as_str)
    }

    /// Path of a newsletter template file, if a template directory is set.
    pub fn template_path(&self, file_name: Option<&str>) -> Option<String> {
        html_template_path(self.template_dir.as_deref()?, file_name)
    }
}
