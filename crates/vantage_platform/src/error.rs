//! Platform error types

use thiserror::Error;

/// Errors raised by signal sources and timer backends
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The host does not provide this capability at all
    #[error("Capability not supported: {0}")]
    Unsupported(&'static str),

    /// The capability exists but its backend has gone away (e.g. scheduler dropped)
    #[error("Capability unavailable: {0}")]
    Unavailable(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
