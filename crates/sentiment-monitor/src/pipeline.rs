//! Fetch, classify and aggregate flows behind the dashboard commands

use crate::api::{MarketDataSource, PriceBar};
use crate::classifier::TextClassifier;
use crate::collectors::{Collector, NewsCollector, ReportCollector, SocialCollector};
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use sentiment_core::{
    ClassificationResult, ClassifiedItem, SentimentSummary, SourceKind, summarize,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

/// One classified item plus the service error it hit, if any
#[derive(Debug, Clone)]
pub struct AnalyzedItem {
    pub classified: ClassifiedItem,
    pub error: Option<String>,
}

impl AnalyzedItem {
    pub fn result(&self) -> &ClassificationResult {
        &self.classified.result
    }
}

/// Items of one source kind for one ticker
#[derive(Debug, Clone)]
pub struct SourceSection {
    pub kind: SourceKind,
    pub items: Vec<AnalyzedItem>,
}

/// Everything analysed for one ticker
#[derive(Debug, Clone)]
pub struct TickerReport {
    pub ticker: String,
    pub sections: Vec<SourceSection>,
    pub warnings: Vec<String>,
}

impl TickerReport {
    fn new(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            sections: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Results across all sections
    pub fn results(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter().map(AnalyzedItem::result))
    }

    /// Label counts and mean score for this ticker
    pub fn summary(&self) -> SentimentSummary {
        summarize(self.results())
    }

    /// Whether any item was classified
    pub fn has_items(&self) -> bool {
        self.sections.iter().any(|s| !s.items.is_empty())
    }
}

/// Which flow produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Recent news only
    News,
    /// News, social posts and financial reports
    Overview,
}

/// Result of a sentiment flow over the selected tickers
#[derive(Debug, Clone)]
pub struct SentimentReport {
    pub kind: ReportKind,
    pub tickers: Vec<TickerReport>,
}

impl SentimentReport {
    /// Summary over every item of every ticker
    pub fn overall(&self) -> SentimentSummary {
        summarize(self.tickers.iter().flat_map(TickerReport::results))
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.iter().all(|t| !t.has_items())
    }
}

/// Closing prices of several tickers aligned by trading date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceFrame {
    tickers: Vec<String>,
    rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

impl PriceFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a ticker's closing prices as a new column
    ///
    /// Returns false, leaving the frame untouched, if the ticker is already
    /// present.
    pub fn add_series(&mut self, ticker: &str, bars: &[PriceBar]) -> bool {
        if self.tickers.iter().any(|t| t == ticker) {
            return false;
        }

        let column = self.tickers.len();
        self.tickers.push(ticker.to_string());
        for row in self.rows.values_mut() {
            row.push(None);
        }
        for bar in bars {
            let row = self
                .rows
                .entry(bar.date())
                .or_insert_with(|| vec![None; column + 1]);
            row[column] = Some(bar.close);
        }
        true
    }

    /// Column order
    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    /// Rows in date order; `None` where a ticker has no bar that day
    pub fn rows(&self) -> impl Iterator<Item = (&NaiveDate, &[Option<f64>])> {
        self.rows.iter().map(|(date, row)| (date, row.as_slice()))
    }

    /// Known closes of one ticker in date order
    pub fn closes(&self, ticker: &str) -> Vec<f64> {
        let Some(column) = self.tickers.iter().position(|t| t == ticker) else {
            return Vec::new();
        };
        self.rows
            .values()
            .filter_map(|row| row.get(column).copied().flatten())
            .collect()
    }

    /// Number of dates
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of the price flow
#[derive(Debug, Clone, Default)]
pub struct PriceReport {
    /// Tickers as requested, in input order
    pub requested: Vec<String>,
    pub frame: PriceFrame,
    /// One message per ticker that could not be fetched
    pub failures: Vec<String>,
}

/// Runs the price, news and overview flows
pub struct SentimentPipeline {
    classifier: TextClassifier,
    market: Arc<dyn MarketDataSource>,
    news: Arc<dyn Collector>,
    social: Arc<dyn Collector>,
    reports: Arc<dyn Collector>,
    config: MonitorConfig,
}

impl SentimentPipeline {
    /// Create a pipeline with the live news collector and the fixed social
    /// and report collectors
    pub fn new(
        classifier: TextClassifier,
        market: Arc<dyn MarketDataSource>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            classifier,
            news: Arc::new(NewsCollector::new(Arc::clone(&market))),
            market,
            social: Arc::new(SocialCollector),
            reports: Arc::new(ReportCollector),
            config,
        }
    }

    /// Replace the social media collector
    pub fn with_social(mut self, collector: Arc<dyn Collector>) -> Self {
        self.social = collector;
        self
    }

    /// Replace the financial report collector
    pub fn with_reports(mut self, collector: Arc<dyn Collector>) -> Self {
        self.reports = collector;
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Fetch price history for each ticker and align the closes by date
    #[instrument(skip(self))]
    pub async fn fetch_prices(&self, tickers: &[String]) -> PriceReport {
        let end = Utc::now();
        let start = history_start(end, self.config.price_history_days);
        let mut report = PriceReport {
            requested: tickers.to_vec(),
            ..PriceReport::default()
        };

        for ticker in tickers {
            if report.frame.tickers().contains(ticker) {
                continue;
            }
            match self.market.price_history(ticker, start, end).await {
                Ok(bars) if bars.is_empty() => {
                    let err = MonitorError::upstream(ticker, "prices", "no price data returned");
                    tracing::warn!(%ticker, "{err}");
                    report.failures.push(err.to_string());
                }
                Ok(bars) => {
                    report.frame.add_series(ticker, &bars);
                }
                Err(e) => {
                    tracing::warn!(%ticker, error = %e, "Price fetch failed");
                    report.failures.push(e.to_string());
                }
            }
        }

        tracing::info!(
            tickers = report.frame.tickers().len(),
            dates = report.frame.len(),
            failures = report.failures.len(),
            "Price flow finished"
        );
        report
    }

    /// Classify recent headlines for each ticker
    #[instrument(skip(self))]
    pub async fn analyze_news(&self, tickers: &[String]) -> SentimentReport {
        let mut reports = Vec::with_capacity(tickers.len());

        for ticker in tickers {
            let mut report = TickerReport::new(ticker);
            self.collect_section(
                self.news.as_ref(),
                &mut report,
                Some(self.config.news_limit_analysis),
                &format!("No recent news found for {ticker}."),
            )
            .await;
            reports.push(report);
        }

        let report = SentimentReport {
            kind: ReportKind::News,
            tickers: reports,
        };
        tracing::info!(items = report.overall().total(), "News sentiment flow finished");
        report
    }

    /// Classify news, social posts and report snippets for each ticker
    #[instrument(skip(self))]
    pub async fn analyze_overview(&self, tickers: &[String]) -> SentimentReport {
        let mut reports = Vec::with_capacity(tickers.len());

        for ticker in tickers {
            let mut report = TickerReport::new(ticker);
            self.collect_section(
                self.news.as_ref(),
                &mut report,
                Some(self.config.news_limit_overview),
                &format!("No news articles found for {ticker}."),
            )
            .await;
            for collector in [&self.social, &self.reports] {
                self.collect_section(
                    collector.as_ref(),
                    &mut report,
                    None,
                    &format!("No {} items found for {ticker}.", collector.source_kind()),
                )
                .await;
            }
            reports.push(report);
        }

        let report = SentimentReport {
            kind: ReportKind::Overview,
            tickers: reports,
        };
        tracing::info!(items = report.overall().total(), "Overall sentiment flow finished");
        report
    }

    async fn collect_section(
        &self,
        collector: &dyn Collector,
        report: &mut TickerReport,
        limit: Option<usize>,
        empty_warning: &str,
    ) {
        let mut items = match collector.fetch(&report.ticker).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(ticker = %report.ticker, error = %e, "Collector failed");
                report.warnings.push(e.to_string());
                return;
            }
        };

        if items.is_empty() {
            report.warnings.push(empty_warning.to_string());
            return;
        }

        if let Some(limit) = limit {
            items.truncate(limit);
        }

        let outcomes = self
            .classifier
            .classify_batch(items, self.config.classify_concurrency)
            .await;

        let items = outcomes
            .into_iter()
            .map(|(item, outcome)| AnalyzedItem {
                classified: ClassifiedItem::new(item, outcome.result),
                error: outcome.error.map(|e| e.to_string()),
            })
            .collect();

        report.sections.push(SourceSection {
            kind: collector.source_kind(),
            items,
        });
    }
}

/// Start of a `days`-long window ending at `end`, saturating at the earliest
/// representable instant
fn history_start(end: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|window| end.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::market::fakes::FakeMarketData;
    use crate::classifier::fakes::KeywordProvider;
    use sentiment_core::SentimentLabel;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn pipeline(market: FakeMarketData) -> (SentimentPipeline, Arc<KeywordProvider>) {
        let provider = Arc::new(KeywordProvider::default());
        let classifier = TextClassifier::new(provider.clone(), "test-model");
        let pipeline = SentimentPipeline::new(classifier, Arc::new(market), MonitorConfig::default());
        (pipeline, provider)
    }

    fn tickers(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| (*t).to_string()).collect()
    }

    #[tokio::test]
    async fn test_news_flow_truncates_and_warns() {
        let market = FakeMarketData::default().with_news("AAPL", 30);
        let (pipeline, provider) = pipeline(market);

        let report = pipeline.analyze_news(&tickers(&["AAPL", "MSFT"])).await;
        assert_eq!(report.kind, ReportKind::News);
        assert_eq!(report.tickers.len(), 2);

        let aapl = &report.tickers[0];
        assert_eq!(aapl.sections.len(), 1);
        assert_eq!(aapl.sections[0].items.len(), 25);
        assert_eq!(provider.calls(), 25);

        let msft = &report.tickers[1];
        assert!(msft.sections.is_empty());
        assert_eq!(msft.warnings, vec!["No recent news found for MSFT.".to_string()]);

        assert_eq!(report.overall().total(), 25);
        assert_eq!(report.overall().count(SentimentLabel::Neutral), 25);
    }

    #[tokio::test]
    async fn test_news_flow_continues_after_upstream_failure() {
        let market = FakeMarketData::default()
            .failing("BAD")
            .with_news("NVDA", 2);
        let (pipeline, _) = pipeline(market);

        let report = pipeline.analyze_news(&tickers(&["BAD", "NVDA"])).await;
        assert_eq!(
            report.tickers[0].warnings,
            vec!["Error fetching news for BAD: service unavailable".to_string()]
        );
        assert_eq!(report.tickers[1].summary().total(), 2);
    }

    #[tokio::test]
    async fn test_overview_flow_sections_and_summary() {
        let market = FakeMarketData::default().with_news("TSLA", 12);
        let (pipeline, provider) = pipeline(market);

        let report = pipeline.analyze_overview(&tickers(&["TSLA"])).await;
        let tsla = &report.tickers[0];
        let kinds: Vec<_> = tsla.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SourceKind::News, SourceKind::SocialPost, SourceKind::Report]
        );
        assert_eq!(tsla.sections[0].items.len(), 10);
        assert_eq!(provider.calls(), 16);

        let summary = report.overall();
        assert_eq!(summary.total(), 16);
        // optimistic, bullish, record-breaking
        assert_eq!(summary.count(SentimentLabel::Positive), 3);
        // overhyped, under pressure
        assert_eq!(summary.count(SentimentLabel::Negative), 2);
        assert_eq!(summary.count(SentimentLabel::Neutral), 11);
        let expected = (3.0 * 0.8 - 2.0 * 0.6) / 16.0;
        assert!((summary.mean_score() - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_overview_without_news_still_runs_other_sources() {
        let (pipeline, _) = pipeline(FakeMarketData::default());

        let report = pipeline.analyze_overview(&tickers(&["AMD"])).await;
        let amd = &report.tickers[0];
        assert_eq!(amd.warnings, vec!["No news articles found for AMD.".to_string()]);
        assert_eq!(amd.sections.len(), 2);
        assert_eq!(amd.summary().total(), 6);
    }

    #[tokio::test]
    async fn test_service_errors_recorded_per_item() {
        let mut market = FakeMarketData::default();
        market.news.insert(
            "META".to_string(),
            vec![
                crate::api::NewsHeadline {
                    title: "Servers fail overnight".to_string(),
                    link: "https://example.com/1".to_string(),
                },
                crate::api::NewsHeadline {
                    title: "Record ad revenue".to_string(),
                    link: "https://example.com/2".to_string(),
                },
            ],
        );
        let (pipeline, _) = pipeline(market);

        let report = pipeline.analyze_news(&tickers(&["META"])).await;
        let items = &report.tickers[0].sections[0].items;
        assert!(items[0].result().is_error());
        assert!(items[0].error.as_deref().unwrap().contains("upstream down"));
        assert_eq!(items[1].result().label(), SentimentLabel::Positive);
        assert!(items[1].error.is_none());

        let summary = report.overall();
        assert_eq!(summary.count(SentimentLabel::Error), 1);
        assert!((summary.mean_score() - 0.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_ticker_list_gives_empty_report() {
        let (pipeline, provider) = pipeline(FakeMarketData::default());

        let report = pipeline.analyze_overview(&[]).await;
        assert!(report.is_empty());
        assert_eq!(report.overall(), SentimentSummary::default());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_price_flow_aligns_dates() {
        let market = FakeMarketData::default()
            .with_closes("AAPL", &[(day(1), 170.0), (day(4), 172.5)])
            .with_closes("MSFT", &[(day(4), 410.0), (day(5), 415.0)])
            .failing("ZZZZ");
        let (pipeline, _) = pipeline(market);

        let report = pipeline
            .fetch_prices(&tickers(&["AAPL", "ZZZZ", "MSFT", "AAPL"]))
            .await;

        assert_eq!(report.requested.len(), 4);
        assert_eq!(report.frame.tickers(), ["AAPL", "MSFT"]);
        assert_eq!(report.failures, vec!["Error fetching prices for ZZZZ: no data found".to_string()]);

        let rows: Vec<_> = report.frame.rows().map(|(d, r)| (*d, r.to_vec())).collect();
        assert_eq!(
            rows,
            vec![
                (day(1), vec![Some(170.0), None]),
                (day(4), vec![Some(172.5), Some(410.0)]),
                (day(5), vec![None, Some(415.0)]),
            ]
        );
        assert_eq!(report.frame.closes("MSFT"), vec![410.0, 415.0]);
        assert!(report.frame.closes("NVDA").is_empty());
    }

    #[tokio::test]
    async fn test_price_flow_reports_empty_history() {
        let (pipeline, _) = pipeline(FakeMarketData::default());

        let report = pipeline.fetch_prices(&tickers(&["IPO"])).await;
        assert!(report.frame.is_empty());
        assert_eq!(
            report.failures,
            vec!["Error fetching prices for IPO: no price data returned".to_string()]
        );
    }

    #[test]
    fn test_history_start_saturates() {
        let end = day(10).and_hms_opt(0, 0, 0).unwrap().and_utc();
        assert_eq!(history_start(end, 9).date_naive(), day(1));
        assert_eq!(history_start(end, i64::MAX), DateTime::<Utc>::MIN_UTC);
    }

    #[tokio::test]
    async fn test_price_flow_with_oversized_window() {
        let config = MonitorConfig {
            price_history_days: i64::MAX,
            ..MonitorConfig::default()
        };
        let classifier = TextClassifier::new(Arc::new(KeywordProvider::default()), "test-model");
        let market = FakeMarketData::default().with_closes("AMD", &[(day(4), 160.0)]);
        let pipeline = SentimentPipeline::new(classifier, Arc::new(market), config);

        let report = pipeline.fetch_prices(&tickers(&["AMD"])).await;
        assert!(report.failures.is_empty());
        assert_eq!(report.frame.closes("AMD"), vec![160.0]);
    }
}
