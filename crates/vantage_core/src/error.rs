//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors from checked index arithmetic
///
/// These indicate a programming error in the caller and are never caught
/// inside the crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    /// An argument was not an integer (fractional, non-finite or non-numeric)
    #[error("next_index: `{argument}` must be an integer, got {value}")]
    InvalidArgument {
        /// Which parameter was rejected (`current`, `delta` or `length`)
        argument: &'static str,
        /// Debug rendering of the rejected value
        value: String,
    },
}

/// Errors from loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
