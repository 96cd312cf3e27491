//! Error types for convention-gate
//!
//! None of these ever reach the hook caller as a failure: the binary turns
//! them into log lines and the permissive outcome.

use std::path::PathBuf;

use thiserror::Error;

/// Why a hook payload could not be decoded into an action request
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Nothing (or only whitespace) was read from stdin
    #[error("hook input is empty")]
    Empty,

    /// The payload is not valid JSON
    #[error("hook input is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON, but not an object
    #[error("hook input must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A field the gate routes on is present with the wrong JSON type
    #[error("hook input field `{0}` must be a string")]
    InvalidField(&'static str),

    /// The payload bytes are not UTF-8
    #[error("hook input is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Reading stdin failed
    #[error("failed to read hook input: {0}")]
    Read(#[from] std::io::Error),
}

impl DecodeError {
    /// Empty input is "nothing to check", not a malformed request
    pub fn is_empty_input(&self) -> bool {
        matches!(self, DecodeError::Empty)
    }
}

/// Errors raised while loading configuration or compiling rules
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A rule pattern is not a valid regular expression
    #[error("rule `{id}` has an invalid pattern: {source}")]
    InvalidPattern {
        id: String,
        #[source]
        source: regex::Error,
    },

    /// An empty governed suffix would put every path under content rules
    #[error("content.governed_suffix must not be empty")]
    EmptySuffix,
}
