//! Market sentiment monitor
//!
//! Fetches price history and news for a handful of tickers, classifies the
//! sentiment of each headline, post and report snippet with a language model,
//! and aggregates the results per ticker and overall. A chat panel forwards
//! free-form questions to an external question-answering endpoint.
//!
//! # Architecture
//!
//! - [`collectors`]: sources of text items (live news, fixed social posts and
//!   report snippets) behind the [`Collector`] trait
//! - [`classifier`]: one completion call per item, reply parsing in
//!   [`parse_reply`]
//! - [`pipeline`]: the price, news and overview flows
//! - [`session`]: conversation, ticker selection and latest reports
//! - [`dashboard`]: command dispatch for the terminal prompt
//!
//! # Example
//!
//! ```rust,ignore
//! use sentiment_llm::providers::OpenAIProvider;
//! use sentiment_monitor::{Dashboard, MonitorConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = Arc::new(OpenAIProvider::from_env()?);
//!     let mut dashboard = Dashboard::with_provider(provider, MonitorConfig::from_env()?)?;
//!     dashboard.process_input("/select AAPL, MSFT").await?;
//!     dashboard.process_input("/news").await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod classifier;
pub mod collectors;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod pipeline;
pub mod prompts;
pub mod render;
pub mod session;

pub use api::{
    CachedMarketData, ChatBackend, ChatReply, HttpChatClient, MarketDataSource, NewsHeadline,
    PriceBar, YahooFinanceClient,
};
pub use classifier::{ClassificationOutcome, TextClassifier, parse_reply};
pub use collectors::{Collector, NewsCollector, ReportCollector, SocialCollector};
pub use commands::Command;
pub use config::{MonitorConfig, MonitorConfigBuilder};
pub use dashboard::{Dashboard, DashboardReply};
pub use error::{MonitorError, Result};
pub use pipeline::{
    AnalyzedItem, PriceFrame, PriceReport, ReportKind, SentimentPipeline, SentimentReport,
    SourceSection, TickerReport,
};
pub use session::SessionContext;
