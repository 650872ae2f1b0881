//! Configuration management utilities

use std::str::FromStr;
use thiserror::Error;

/// Errors raised while reading configuration from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "LOG_FORMAT".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Process-level configuration shared by binaries
#[derive(Debug, Clone)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
    /// Log line format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "sentiment-monitor".to_string(),
            environment: "development".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Read `APP_ENV` and `LOG_FORMAT`, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            app_name: defaults.app_name,
            environment: env_or("APP_ENV", &defaults.environment),
            log_format: env_parse("LOG_FORMAT")?.unwrap_or(defaults.log_format),
        })
    }
}

/// Load a `.env` file from the working directory (or a parent) if present
///
/// Returns `true` when a file was found. Variables already set in the process
/// environment are not overridden.
pub fn load_env() -> bool {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            true
        }
        Err(_) => false,
    }
}

/// Read an environment variable, returning `default` when unset or empty
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Read and parse an environment variable
///
/// Unset or empty variables yield `Ok(None)`; unparseable ones are an error.
pub fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                })
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" Text ".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_env_or() {
        unsafe {
            std::env::set_var("SENTIMENT_UTILS_TEST_OR", "value");
            std::env::set_var("SENTIMENT_UTILS_TEST_OR_EMPTY", "  ");
        }
        assert_eq!(env_or("SENTIMENT_UTILS_TEST_OR", "default"), "value");
        assert_eq!(env_or("SENTIMENT_UTILS_TEST_OR_EMPTY", "default"), "default");
        assert_eq!(env_or("SENTIMENT_UTILS_TEST_OR_MISSING", "default"), "default");
        unsafe {
            std::env::remove_var("SENTIMENT_UTILS_TEST_OR");
            std::env::remove_var("SENTIMENT_UTILS_TEST_OR_EMPTY");
        }
    }

    #[test]
    fn test_env_parse() {
        unsafe {
            std::env::set_var("SENTIMENT_UTILS_TEST_NUM", "4");
            std::env::set_var("SENTIMENT_UTILS_TEST_BAD", "four");
        }
        assert_eq!(env_parse::<usize>("SENTIMENT_UTILS_TEST_NUM").unwrap(), Some(4));
        assert!(env_parse::<usize>("SENTIMENT_UTILS_TEST_BAD").is_err());
        assert_eq!(env_parse::<usize>("SENTIMENT_UTILS_TEST_UNSET").unwrap(), None);
        unsafe {
            std::env::remove_var("SENTIMENT_UTILS_TEST_NUM");
            std::env::remove_var("SENTIMENT_UTILS_TEST_BAD");
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app_name, "sentiment-monitor");
        assert_eq!(config.log_format, LogFormat::Text);
    }
}
