//! Configuration for sentiment monitoring operations

use crate::error::{MonitorError, Result};
use sentiment_core::DEFAULT_MAX_TICKERS;
use sentiment_utils::{env_or, env_parse};
use std::time::Duration;
use url::Url;

/// Longest price history window accepted (about a century)
pub const MAX_PRICE_HISTORY_DAYS: i64 = 36_500;

/// Configuration for the monitor and its upstream calls
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Language model used for classification
    pub model: String,

    /// Maximum tokens per classification reply
    pub max_tokens: usize,

    /// Sampling temperature for classification
    pub temperature: f32,

    /// Number of classification calls in flight at once (1 = sequential)
    pub classify_concurrency: usize,

    /// Chat backend endpoint (question/chatId JSON POST)
    pub chat_api_url: Option<String>,

    /// Timeout for chat backend requests
    pub request_timeout: Duration,

    /// Headlines analysed per ticker in the news flow
    pub news_limit_analysis: usize,

    /// Headlines analysed per ticker in the overview flow
    pub news_limit_overview: usize,

    /// Days of price history fetched per ticker
    pub price_history_days: i64,

    /// Maximum tickers accepted from one input
    pub max_tickers: usize,

    /// Initial ticker selection for the sentiment flows
    pub default_selection: String,

    /// Initial ticker input for the price flow
    pub default_price_tickers: String,

    /// Cache TTL for price history
    pub cache_ttl_prices: Duration,

    /// Cache TTL for news headlines
    pub cache_ttl_news: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 256,
            temperature: 0.2,
            classify_concurrency: 1,
            chat_api_url: None,
            request_timeout: Duration::from_secs(60),
            news_limit_analysis: 25,
            news_limit_overview: 10,
            price_history_days: 5000,
            max_tickers: DEFAULT_MAX_TICKERS,
            default_selection: "AAPL, MSFT".to_string(),
            default_price_tickers: "AAPL, MSFT, NVDA".to_string(),
            cache_ttl_prices: Duration::from_secs(900), // 15 minutes
            cache_ttl_news: Duration::from_secs(300),   // 5 minutes
        }
    }
}

impl MonitorConfig {
    /// Create a new configuration builder
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::default()
    }

    /// Build a configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(MonitorError::ConfigError("model must not be empty".to_string()));
        }

        if self.classify_concurrency == 0 {
            return Err(MonitorError::ConfigError(
                "classify_concurrency must be greater than 0".to_string(),
            ));
        }

        if self.max_tickers == 0 {
            return Err(MonitorError::ConfigError(
                "max_tickers must be greater than 0".to_string(),
            ));
        }

        if !(1..=MAX_PRICE_HISTORY_DAYS).contains(&self.price_history_days) {
            return Err(MonitorError::ConfigError(format!(
                "price_history_days must be between 1 and {MAX_PRICE_HISTORY_DAYS}"
            )));
        }

        if let Some(url) = &self.chat_api_url {
            Url::parse(url).map_err(|e| {
                MonitorError::ConfigError(format!("invalid chat_api_url {url:?}: {e}"))
            })?;
        }

        Ok(())
    }
}

/// Builder for MonitorConfig
#[derive(Debug, Default)]
pub struct MonitorConfigBuilder {
    model: Option<String>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    classify_concurrency: Option<usize>,
    chat_api_url: Option<String>,
    request_timeout: Option<Duration>,
    news_limit_analysis: Option<usize>,
    news_limit_overview: Option<usize>,
    price_history_days: Option<i64>,
    max_tickers: Option<usize>,
    default_selection: Option<String>,
    cache_ttl_news: Option<Duration>,
}

impl MonitorConfigBuilder {
    /// Set the classification model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set maximum tokens per classification
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set classification concurrency
    pub fn classify_concurrency(mut self, concurrency: usize) -> Self {
        self.classify_concurrency = Some(concurrency);
        self
    }

    /// Set the chat backend endpoint
    pub fn chat_api_url(mut self, url: impl Into<String>) -> Self {
        self.chat_api_url = Some(url.into());
        self
    }

    /// Set the chat request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the per-ticker headline limit of the news flow
    pub fn news_limit_analysis(mut self, limit: usize) -> Self {
        self.news_limit_analysis = Some(limit);
        self
    }

    /// Set the per-ticker headline limit of the overview flow
    pub fn news_limit_overview(mut self, limit: usize) -> Self {
        self.news_limit_overview = Some(limit);
        self
    }

    /// Set the price history window in days
    pub fn price_history_days(mut self, days: i64) -> Self {
        self.price_history_days = Some(days);
        self
    }

    /// Set the maximum number of tickers per input
    pub fn max_tickers(mut self, max: usize) -> Self {
        self.max_tickers = Some(max);
        self
    }

    /// Set the initial ticker selection
    pub fn default_selection(mut self, tickers: impl Into<String>) -> Self {
        self.default_selection = Some(tickers.into());
        self
    }

    /// Set the news cache TTL
    pub fn cache_ttl_news(mut self, ttl: Duration) -> Self {
        self.cache_ttl_news = Some(ttl);
        self
    }

    /// Fill unset fields from the environment
    ///
    /// Reads `OPENAI_MODEL`, `CHAT_API_URL`, `SENTIMENT_CONCURRENCY` and
    /// `SENTIMENT_TICKERS`. Values already set on the builder win.
    pub fn with_env(mut self) -> Result<Self> {
        if self.model.is_none() {
            self.model = std::env::var("OPENAI_MODEL").ok().filter(|m| !m.is_empty());
        }
        if self.chat_api_url.is_none() {
            self.chat_api_url = std::env::var("CHAT_API_URL").ok().filter(|u| !u.is_empty());
        }
        if self.classify_concurrency.is_none() {
            self.classify_concurrency = env_parse("SENTIMENT_CONCURRENCY")?;
        }
        if self.default_selection.is_none() {
            let defaults = MonitorConfig::default();
            self.default_selection =
                Some(env_or("SENTIMENT_TICKERS", &defaults.default_selection));
        }
        Ok(self)
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<MonitorConfig> {
        let defaults = MonitorConfig::default();

        let config = MonitorConfig {
            model: self.model.unwrap_or(defaults.model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            classify_concurrency: self
                .classify_concurrency
                .unwrap_or(defaults.classify_concurrency),
            chat_api_url: self.chat_api_url.or(defaults.chat_api_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            news_limit_analysis: self
                .news_limit_analysis
                .unwrap_or(defaults.news_limit_analysis),
            news_limit_overview: self
                .news_limit_overview
                .unwrap_or(defaults.news_limit_overview),
            price_history_days: self.price_history_days.unwrap_or(defaults.price_history_days),
            max_tickers: self.max_tickers.unwrap_or(defaults.max_tickers),
            default_selection: self.default_selection.unwrap_or(defaults.default_selection),
            cache_ttl_news: self.cache_ttl_news.unwrap_or(defaults.cache_ttl_news),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.news_limit_analysis, 25);
        assert_eq!(config.news_limit_overview, 10);
        assert_eq!(config.price_history_days, 5000);
        assert_eq!(config.max_tickers, 5);
        assert_eq!(config.classify_concurrency, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = MonitorConfig::builder()
            .model("gpt-4o-mini")
            .classify_concurrency(4)
            .chat_api_url("http://localhost:3000/api/v1/prediction/abc")
            .request_timeout(Duration::from_secs(10))
            .build()
            .unwrap();

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.classify_concurrency, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(
            config.chat_api_url.as_deref(),
            Some("http://localhost:3000/api/v1/prediction/abc")
        );
    }

    #[test]
    fn test_validation_failures() {
        assert!(MonitorConfig::builder().classify_concurrency(0).build().is_err());
        assert!(MonitorConfig::builder().max_tickers(0).build().is_err());
        assert!(MonitorConfig::builder().price_history_days(0).build().is_err());
        assert!(
            MonitorConfig::builder()
                .price_history_days(MAX_PRICE_HISTORY_DAYS + 1)
                .build()
                .is_err()
        );
        assert!(
            MonitorConfig::builder()
                .price_history_days(MAX_PRICE_HISTORY_DAYS)
                .build()
                .is_ok()
        );
        assert!(MonitorConfig::builder().model("  ").build().is_err());
        assert!(
            MonitorConfig::builder()
                .chat_api_url("not a url")
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_builder_wins_over_env() {
        unsafe {
            std::env::set_var("SENTIMENT_CONCURRENCY", "8");
        }
        let config = MonitorConfig::builder()
            .classify_concurrency(2)
            .with_env()
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.classify_concurrency, 2);

        let config = MonitorConfig::builder().with_env().unwrap().build().unwrap();
        assert_eq!(config.classify_concurrency, 8);
        unsafe {
            std::env::remove_var("SENTIMENT_CONCURRENCY");
        }
    }
}
