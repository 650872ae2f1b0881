//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    /// API request failed
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Whether the failure happened before any reply was produced by the model
    /// because of local configuration rather than the remote service
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError(_) | Self::AuthenticationFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LLMError::RateLimitExceeded("slow down".to_string());
        assert_eq!(err.to_string(), "Rate limit exceeded: slow down");
        assert_eq!(
            LLMError::AuthenticationFailed.to_string(),
            "Invalid API key or authentication failed"
        );
    }

    #[test]
    fn test_is_configuration() {
        assert!(LLMError::AuthenticationFailed.is_configuration());
        assert!(LLMError::ConfigurationError("missing key".into()).is_configuration());
        assert!(!LLMError::RequestFailed("HTTP 500".into()).is_configuration());
    }
}
