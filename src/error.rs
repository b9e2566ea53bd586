//! Error types for missive operations.

use thiserror::Error;

/// Errors that can occur while configuring or running a rewrite.
///
/// Only configuration problems are errors. Markup that does not match the
/// expected attribute pattern is passed through unchanged.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL must have a host: {0}")]
    NotHierarchical(String),

    #[error("missing required configuration value: {0}")]
    MissingConfig(&'static str),

    #[error("unknown element kind: {0}")]
    UnknownElementKind(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
