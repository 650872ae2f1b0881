//! Error types for sentiment-core

use thiserror::Error;

/// Result type alias for sentiment-core
pub type Result<T> = std::result::Result<T, CoreError>;

/// Error type for core data model operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Text did not name one of the known sentiment labels
    #[error("Unknown sentiment label: {0}")]
    UnknownLabel(String),

    /// A link could not be parsed as an absolute URL
    #[error("Invalid link {link:?}: {reason}")]
    InvalidLink { link: String, reason: String },
}
