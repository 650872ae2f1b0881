//! Session-lifetime TTL caches for market data

use cached::{Cached, TimedCache};
use chrono::NaiveDate;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// What a cached value answers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Daily history of `ticker` over a calendar-date window
    Prices {
        ticker: String,
        from: NaiveDate,
        to: NaiveDate,
    },
    /// Recent headlines of `ticker`
    News { ticker: String },
}

impl CacheKey {
    pub fn prices(ticker: &str, from: NaiveDate, to: NaiveDate) -> Self {
        Self::Prices {
            ticker: ticker.to_string(),
            from,
            to,
        }
    }

    pub fn news(ticker: &str) -> Self {
        Self::News {
            ticker: ticker.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prices { ticker, from, to } => write!(f, "prices:{ticker}:{from}..{to}"),
            Self::News { ticker } => write!(f, "news:{ticker}"),
        }
    }
}

/// TTL cache whose clones share one store
pub struct MarketCache<V> {
    store: Arc<RwLock<TimedCache<CacheKey, V>>>,
}

impl<V> Clone for MarketCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<V: Clone> MarketCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Cached value for `key`, or the result of `fetch` stored under it
    ///
    /// Failed fetches are passed through and leave the cache untouched.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: CacheKey, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        // expired entries are evicted on lookup, which needs the write lock
        if let Some(hit) = self.store.write().await.cache_get(&key).cloned() {
            debug!(%key, "cache hit");
            return Ok(hit);
        }

        debug!(%key, "cache miss");
        let value = fetch().await?;
        let _ = self.store.write().await.cache_set(key, value.clone());
        Ok(value)
    }

    pub async fn clear(&self) {
        self.store.write().await.cache_clear();
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.cache_size()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
