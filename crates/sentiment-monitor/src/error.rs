//! Error types for sentiment monitoring operations

use sentiment_core::CoreError;
use sentiment_llm::LLMError;
use sentiment_utils::ConfigError;
use thiserror::Error;

/// Sentiment monitor errors
///
/// Upstream, classification and chat failures are all recoverable: the
/// pipeline reports them and carries on with the remaining tickers or items.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Market data or news could not be retrieved for a ticker
    #[error("Error fetching {what} for {ticker}: {reason}")]
    UpstreamFetch {
        ticker: String,
        what: &'static str,
        reason: String,
    },

    /// The language-model call failed
    #[error("Error during sentiment analysis: {0}")]
    ClassificationService(#[from] LLMError),

    /// The chat endpoint failed or returned a non-success status
    #[error("An error occurred: {0}")]
    ChatService(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinanceError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Unparseable dashboard command
    #[error("Command error: {0}")]
    CommandError(String),

    /// Data model error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for monitor operations
pub type Result<T> = std::result::Result<T, MonitorError>;

impl From<ConfigError> for MonitorError {
    fn from(err: ConfigError) -> Self {
        MonitorError::ConfigError(err.to_string())
    }
}

impl MonitorError {
    /// Wrap a failure as an upstream fetch error for `ticker`
    pub fn upstream(ticker: &str, what: &'static str, reason: impl std::fmt::Display) -> Self {
        MonitorError::UpstreamFetch {
            ticker: ticker.to_string(),
            what,
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MonitorError::upstream("AAPL", "news", "timeout");
        assert_eq!(err.to_string(), "Error fetching news for AAPL: timeout");

        let err = MonitorError::ChatService("HTTP 502".to_string());
        assert_eq!(err.to_string(), "An error occurred: HTTP 502");
    }

    #[test]
    fn test_error_conversion() {
        let err: MonitorError = LLMError::AuthenticationFailed.into();
        assert!(matches!(err, MonitorError::ClassificationService(_)));
        assert!(err.to_string().starts_with("Error during sentiment analysis"));

        let err: MonitorError = ConfigError::InvalidValue {
            key: "K".to_string(),
            value: "v".to_string(),
        }
        .into();
        assert!(matches!(err, MonitorError::ConfigError(_)));

        let err: MonitorError = CoreError::UnknownLabel("Bullish".to_string()).into();
        assert!(matches!(err, MonitorError::Core(_)));
    }
}
