//! Error types for the configuration layer
//!
//! The executor itself has no error type of its own: it propagates the
//! wrapped operation's error unchanged. These errors arise only when loading
//! and validating policy files.

use thiserror::Error;

/// Result type alias using brokkr's Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Policy file not found
    #[error("Policy file not found: {path}")]
    ConfigNotFound { path: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A policy fails validation
    #[error("Invalid retry policy '{name}': {message}")]
    InvalidPolicy { name: String, message: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid policy error
    pub fn invalid_policy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            name: name.into(),
            message: message.into(),
        }
    }
}
