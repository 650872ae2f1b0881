//! Yahoo Finance market data client

use super::market::{MarketDataSource, NewsHeadline, PriceBar};
use crate::error::{MonitorError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use tracing::instrument;
use yahoo_finance_api as yahoo;

/// Yahoo Finance client for daily price history and headline search
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    fn connector() -> Result<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(|e| MonitorError::YahooFinanceError(e.to_string()))
    }
}

fn to_offset(ticker: &str, at: DateTime<Utc>) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(at.timestamp())
        .map_err(|e| MonitorError::upstream(ticker, "prices", format!("invalid timestamp: {e}")))
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    #[instrument(skip(self), fields(source = "yahoo"))]
    async fn price_history(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>> {
        let provider = Self::connector()?;
        let start_odt = to_offset(ticker, start)?;
        let end_odt = to_offset(ticker, end)?;

        let response = provider
            .get_quote_history(ticker, start_odt, end_odt)
            .await
            .map_err(|e| MonitorError::upstream(ticker, "prices", e))?;

        let quotes = response
            .quotes()
            .map_err(|e| MonitorError::upstream(ticker, "prices", e))?;

        let bars: Vec<PriceBar> = quotes
            .iter()
            .filter_map(|q| {
                DateTime::from_timestamp(q.timestamp as i64, 0).map(|timestamp| PriceBar {
                    timestamp,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume,
                })
            })
            .collect();

        tracing::debug!(bars = bars.len(), "Fetched price history");
        Ok(bars)
    }

    #[instrument(skip(self), fields(source = "yahoo"))]
    async fn news(&self, ticker: &str) -> Result<Vec<NewsHeadline>> {
        let provider = Self::connector()?;

        let result = provider
            .search_ticker(ticker)
            .await
            .map_err(|e| MonitorError::upstream(ticker, "news", e))?;

        let headlines: Vec<NewsHeadline> = result
            .news
            .into_iter()
            .map(|item| NewsHeadline {
                title: item.title,
                link: item.link,
            })
            .collect();

        tracing::debug!(headlines = headlines.len(), "Fetched news");
        Ok(headlines)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}
