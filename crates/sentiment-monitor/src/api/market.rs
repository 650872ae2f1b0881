//! Market data abstraction shared by the price flow and the news collector

use crate::cache::{CacheKey, MarketCache};
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One daily bar of price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Trading date of the bar (UTC)
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// A recent news headline for a ticker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsHeadline {
    pub title: String,
    pub link: String,
}

/// Source of price history and recent news
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily bars for `ticker` between `start` and `end`
    async fn price_history(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>>;

    /// Recent headlines for `ticker`, newest first as returned upstream
    async fn news(&self, ticker: &str) -> Result<Vec<NewsHeadline>>;

    /// Source name for logging
    fn name(&self) -> &str;
}

/// Caching decorator around any market data source
///
/// Price history is keyed by ticker and calendar dates, so repeated fetches on
/// the same day hit the cache.
pub struct CachedMarketData {
    inner: Arc<dyn MarketDataSource>,
    prices: MarketCache<Vec<PriceBar>>,
    news: MarketCache<Vec<NewsHeadline>>,
}

impl CachedMarketData {
    /// Wrap `inner` with separate TTLs for prices and news
    pub fn new(inner: Arc<dyn MarketDataSource>, prices_ttl: Duration, news_ttl: Duration) -> Self {
        Self {
            inner,
            prices: MarketCache::new(prices_ttl),
            news: MarketCache::new(news_ttl),
        }
    }

    /// Drop every cached entry
    pub async fn clear(&self) {
        self.prices.clear().await;
        self.news.clear().await;
    }
}

#[async_trait]
impl MarketDataSource for CachedMarketData {
    async fn price_history(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceBar>> {
        let key = CacheKey::prices(ticker, start.date_naive(), end.date_naive());
        self.prices
            .get_or_fetch(key, || self.inner.price_history(ticker, start, end))
            .await
    }

    async fn news(&self, ticker: &str) -> Result<Vec<NewsHeadline>> {
        let key = CacheKey::news(ticker);
        self.news
            .get_or_fetch(key, || self.inner.news(ticker))
            .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::FakeMarketData;
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_cached_news_fetched_once() {
        let fake = Arc::new(FakeMarketData::default().with_news("AAPL", 3));
        let cached = CachedMarketData::new(
            fake.clone(),
            Duration::from_secs(60),
            Duration::from_secs(60),
        );

        assert_eq!(cached.news("AAPL").await.unwrap().len(), 3);
        assert_eq!(cached.news("AAPL").await.unwrap().len(), 3);
        assert_eq!(fake.calls(), 1);

        cached.clear().await;
        cached.news("AAPL").await.unwrap();
        assert_eq!(fake.calls(), 2);
    }

    #[tokio::test]
    async fn test_cached_prices_keyed_by_range() {
        let fake = Arc::new(FakeMarketData::default().with_closes("MSFT", &[(day(2), 370.0)]));
        let cached = CachedMarketData::new(
            fake.clone(),
            Duration::from_secs(60),
            Duration::from_secs(60),
        );
        let end = Utc::now();

        let first = cached
            .price_history("MSFT", end - chrono::Duration::days(30), end)
            .await
            .unwrap();
        assert_eq!(first[0].date(), day(2));
        cached
            .price_history("MSFT", end - chrono::Duration::days(30), end)
            .await
            .unwrap();
        assert_eq!(fake.calls(), 1);

        cached
            .price_history("MSFT", end - chrono::Duration::days(60), end)
            .await
            .unwrap();
        assert_eq!(fake.calls(), 2);
    }

    #[tokio::test]
    async fn test_errors_pass_through_uncached() {
        let fake = Arc::new(FakeMarketData::default().failing("ZZZZ"));
        let cached = CachedMarketData::new(
            fake.clone(),
            Duration::from_secs(60),
            Duration::from_secs(60),
        );

        assert!(cached.news("ZZZZ").await.is_err());
        assert!(cached.news("ZZZZ").await.is_err());
        assert_eq!(fake.calls(), 2);
    }
}
