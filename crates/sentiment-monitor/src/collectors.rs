//! Text collectors feeding the classifier

use crate::api::MarketDataSource;
use crate::error::Result;
use async_trait::async_trait;
use sentiment_core::{SourceKind, TextItem};
use std::sync::Arc;
use tracing::instrument;

/// Source of text items for a ticker
#[async_trait]
pub trait Collector: Send + Sync {
    /// Collect every available item for `ticker`; callers truncate
    async fn fetch(&self, ticker: &str) -> Result<Vec<TextItem>>;

    /// Kind of item this collector produces
    fn source_kind(&self) -> SourceKind;
}

/// News headlines from the market data feed
pub struct NewsCollector {
    market: Arc<dyn MarketDataSource>,
}

impl NewsCollector {
    pub fn new(market: Arc<dyn MarketDataSource>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Collector for NewsCollector {
    #[instrument(skip(self), fields(source = self.market.name()))]
    async fn fetch(&self, ticker: &str) -> Result<Vec<TextItem>> {
        let headlines = self.market.news(ticker).await?;

        let items = headlines
            .into_iter()
            .map(|headline| {
                let item = TextItem::new(SourceKind::News, headline.title).for_ticker(ticker);
                match item.clone().try_with_link(&headline.link) {
                    Ok(linked) => linked,
                    Err(e) => {
                        tracing::debug!(error = %e, "Dropping unparseable news link");
                        item
                    }
                }
            })
            .collect();

        Ok(items)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::News
    }
}

/// Fixed social media posts templated with the ticker
#[derive(Debug, Clone, Copy, Default)]
pub struct SocialCollector;

const SOCIAL_POSTS: [&str; 3] = [
    "Everyone is optimistic about {ticker} after their latest earnings!",
    "{ticker} stock is overhyped in my opinion.",
    "{ticker} has shown solid growth; I'm bullish on this company.",
];

#[async_trait]
impl Collector for SocialCollector {
    async fn fetch(&self, ticker: &str) -> Result<Vec<TextItem>> {
        Ok(templated(SourceKind::SocialPost, &SOCIAL_POSTS, ticker))
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::SocialPost
    }
}

/// Fixed financial report snippets templated with the ticker
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportCollector;

const REPORT_SNIPPETS: [&str; 3] = [
    "{ticker} reports record-breaking revenue growth in Q3.",
    "{ticker}'s gross margins are under pressure despite increased sales.",
    "{ticker}'s long-term guidance remains unchanged amid market uncertainty.",
];

#[async_trait]
impl Collector for ReportCollector {
    async fn fetch(&self, ticker: &str) -> Result<Vec<TextItem>> {
        Ok(templated(SourceKind::Report, &REPORT_SNIPPETS, ticker))
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Report
    }
}

fn templated(kind: SourceKind, templates: &[&str], ticker: &str) -> Vec<TextItem> {
    templates
        .iter()
        .map(|t| TextItem::new(kind, t.replace("{ticker}", ticker)).for_ticker(ticker))
        .collect()
}
