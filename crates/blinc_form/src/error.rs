//! Error types for blinc_form
//!
//! These are misuse and configuration errors. Validation failures are not
//! errors in this sense; they are reported through
//! [`ErrorMap`](crate::ErrorMap) and [`ErrorTree`](crate::ErrorTree).

use thiserror::Error;

/// Errors that can occur while configuring or driving a form
#[derive(Error, Debug)]
pub enum FormError {
    /// A field name is not a well-formed dotted path
    #[error("invalid field path {path:?}: {reason}")]
    InvalidPath { path: String, reason: &'static str },

    /// A `pattern` rule failed to compile
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An event or lookup referenced a field that was never registered
    #[error("unknown field {0:?}")]
    UnknownField(String),

    /// Failed to parse a TOML form spec
    #[error("form spec parsing failed: {0}")]
    SpecToml(#[from] toml::de::Error),

    /// Failed to parse a JSON form spec
    #[error("form spec parsing failed: {0}")]
    SpecJson(#[from] serde_json::Error),
}

/// Result type for blinc_form operations
pub type Result<T> = std::result::Result<T, FormError>;
