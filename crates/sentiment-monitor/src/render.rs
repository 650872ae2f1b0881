//! Plain-text rendering of reports for the terminal

use crate::pipeline::{PriceReport, ReportKind, SentimentReport, TickerReport};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use sentiment_core::{Conversation, SentimentSummary, SourceKind, TurnRole};

const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 40;
const BAR_WIDTH: usize = 30;
const RECENT_ROWS: usize = 5;

/// Render a line of block characters tracing `values`
///
/// Long series are sampled down to `width` points.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let step = values.len().div_ceil(width);
    let sampled: Vec<f64> = values.iter().step_by(step.max(1)).copied().collect();

    let (min, max) = sampled
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let range = max - min;

    sampled
        .iter()
        .map(|v| {
            if range <= f64::EPSILON {
                SPARK_CHARS[SPARK_CHARS.len() / 2]
            } else {
                let idx = ((v - min) / range * (SPARK_CHARS.len() - 1) as f64).round() as usize;
                SPARK_CHARS[idx.min(SPARK_CHARS.len() - 1)]
            }
        })
        .collect()
}

/// Closing-price overview: per-ticker trend table plus the latest dates
pub fn render_prices(report: &PriceReport) -> String {
    let mut out = String::new();

    for failure in &report.failures {
        out.push_str(&format!("❌ {failure}\n"));
    }

    if !report.frame.is_empty() {
        let mut trend = Table::new();
        trend
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Ticker", "First", "Last", "Change", "Low", "High", "Trend"]);

        for ticker in report.frame.tickers() {
            let closes = report.frame.closes(ticker);
            let (Some(first), Some(last)) = (closes.first(), closes.last()) else {
                continue;
            };
            let low = closes.iter().copied().fold(f64::INFINITY, f64::min);
            let high = closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let change = if *first == 0.0 {
                0.0
            } else {
                (last - first) / first * 100.0
            };

            trend.add_row(vec![
                Cell::new(ticker),
                Cell::new(format!("{first:.2}")).set_alignment(CellAlignment::Right),
                Cell::new(format!("{last:.2}")).set_alignment(CellAlignment::Right),
                Cell::new(format!("{change:+.1}%")).set_alignment(CellAlignment::Right),
                Cell::new(format!("{low:.2}")).set_alignment(CellAlignment::Right),
                Cell::new(format!("{high:.2}")).set_alignment(CellAlignment::Right),
                Cell::new(sparkline(&closes, SPARK_WIDTH)),
            ]);
        }
        out.push_str(&format!("{trend}\n"));

        let mut recent = Table::new();
        let mut header = vec!["Date".to_string()];
        header.extend(report.frame.tickers().iter().cloned());
        recent.load_preset(UTF8_FULL).set_header(header);

        let rows: Vec<_> = report.frame.rows().collect();
        for (date, closes) in rows.iter().skip(rows.len().saturating_sub(RECENT_ROWS)) {
            let mut row = vec![Cell::new(date.to_string())];
            row.extend(closes.iter().map(|c| {
                Cell::new(c.map_or_else(|| "-".to_string(), |v| format!("{v:.2}")))
                    .set_alignment(CellAlignment::Right)
            }));
            recent.add_row(row);
        }
        out.push_str(&format!("{recent}\n"));
    }

    out.push_str(&format!("Showing stock data for: {}", report.requested.join(", ")));
    out
}

/// Horizontal bar chart of label counts
pub fn render_distribution(title: &str, summary: &SentimentSummary) -> String {
    let mut out = format!("{title}\n");
    if summary.is_empty() {
        out.push_str("  (no results)\n");
        return out;
    }

    let peak = summary.counts().values().copied().max().unwrap_or(1).max(1);
    let label_width = summary
        .counts()
        .keys()
        .map(|l| l.as_str().len())
        .max()
        .unwrap_or(0);

    for (label, count) in summary.counts() {
        let len = (count * BAR_WIDTH).div_ceil(peak);
        out.push_str(&format!(
            "  {:<label_width$} │{} {count}\n",
            label.as_str(),
            "█".repeat(len)
        ));
    }
    out
}

fn item_prefix(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::News => "News Title",
        SourceKind::SocialPost => "Post",
        SourceKind::Report => "Report",
        SourceKind::ChatQuery => "Question",
    }
}

fn render_ticker(out: &mut String, kind: ReportKind, ticker: &TickerReport) {
    match kind {
        ReportKind::News => {
            for warning in &ticker.warnings {
                out.push_str(&format!("⚠️  {warning}\n"));
            }
            if !ticker.has_items() {
                return;
            }
            out.push_str(&format!("\n=== Recent News and Sentiment Analysis for {} ===\n", ticker.ticker));
        }
        ReportKind::Overview => {
            out.push_str(&format!("\n=== Sentiment Analysis for {} ===\n", ticker.ticker));
            for warning in &ticker.warnings {
                out.push_str(&format!("⚠️  {warning}\n"));
            }
        }
    }

    for section in &ticker.sections {
        if kind == ReportKind::Overview {
            out.push_str(&format!("\n## {}\n", section.kind.heading()));
        }
        for analyzed in &section.items {
            let item = &analyzed.classified.item;
            let result = analyzed.result();
            match (kind, item.origin_link()) {
                (ReportKind::News, Some(link)) => {
                    out.push_str(&format!("- {} <{link}>\n", item.body()));
                }
                (ReportKind::News, None) => {
                    out.push_str(&format!("- {}\n", item.body()));
                }
                (ReportKind::Overview, _) => {
                    out.push_str(&format!("{}: {}\n", item_prefix(item.source_kind()), item.body()));
                }
            }
            if let Some(error) = &analyzed.error {
                out.push_str(&format!("  ❌ {error}\n"));
            }
            out.push_str(&format!("  Sentiment: {}, Score: {:.2}\n", result.label(), result.score()));
            out.push_str(&format!("  Highlight: {}\n", result.highlight()));
            out.push_str("---\n");
        }
    }
}

/// Full text of a news or overview report
pub fn render_sentiment_report(report: &SentimentReport) -> String {
    let mut out = String::new();

    for ticker in &report.tickers {
        render_ticker(&mut out, report.kind, ticker);
    }

    if report.kind == ReportKind::News {
        for ticker in report.tickers.iter().filter(|t| t.has_items()) {
            out.push('\n');
            out.push_str(&render_distribution(
                &format!("Sentiment Distribution for {}", ticker.ticker),
                &ticker.summary(),
            ));
        }
    }

    let overall = report.overall();
    out.push('\n');
    out.push_str(&render_distribution("Overall Sentiment Distribution", &overall));
    out.push_str(&format!(
        "\nOverall Average Sentiment Score: {:.2}",
        overall.mean_score()
    ));
    out
}

/// Chat transcript in submission order
pub fn render_transcript(conversation: &Conversation) -> String {
    if conversation.is_empty() {
        return "No messages yet.".to_string();
    }

    conversation
        .all_turns()
        .iter()
        .map(|turn| {
            let speaker = match turn.role {
                TurnRole::User => "You",
                TurnRole::Assistant => "Bot",
            };
            format!("{speaker}: {}", turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PriceBar;
    use crate::pipeline::{AnalyzedItem, PriceFrame, SourceSection};
    use chrono::NaiveDate;
    use sentiment_core::{
        ClassificationResult, ClassifiedItem, ConversationTurn, SentimentLabel, TextItem,
        summarize,
    };

    fn analyzed(kind: SourceKind, body: &str, label: SentimentLabel, score: f64) -> AnalyzedItem {
        AnalyzedItem {
            classified: ClassifiedItem::new(
                TextItem::new(kind, body).for_ticker("AAPL"),
                ClassificationResult::new(label, score, "key point"),
            ),
            error: None,
        }
    }

    #[test]
    fn test_sparkline_shape() {
        assert_eq!(sparkline(&[], 10), "");
        assert_eq!(sparkline(&[1.0, 2.0, 3.0], 10), "▁▅█");
        assert_eq!(sparkline(&[5.0, 5.0], 10), "▅▅");
        assert_eq!(sparkline(&vec![1.0; 100], 10).chars().count(), 10);
    }

    #[test]
    fn test_distribution_bars() {
        let results = vec![
            ClassificationResult::new(SentimentLabel::Positive, 0.5, ""),
            ClassificationResult::new(SentimentLabel::Positive, 0.7, ""),
            ClassificationResult::new(SentimentLabel::Negative, -0.2, ""),
        ];
        let text = render_distribution("Overall Sentiment Distribution", &summarize(&results));

        assert!(text.starts_with("Overall Sentiment Distribution\n"));
        assert!(text.contains(&format!("Positive │{} 2", "█".repeat(30))));
        assert!(text.contains(&format!("Negative │{} 1", "█".repeat(15))));
        assert!(!text.contains("Neutral"));
    }

    #[test]
    fn test_empty_distribution() {
        let text = render_distribution("Overall", &SentimentSummary::default());
        assert!(text.contains("(no results)"));
    }

    #[test]
    fn test_news_report_text() {
        let report = SentimentReport {
            kind: ReportKind::News,
            tickers: vec![
                TickerReport {
                    ticker: "AAPL".to_string(),
                    sections: vec![SourceSection {
                        kind: SourceKind::News,
                        items: vec![
                            analyzed(SourceKind::News, "Apple beats estimates", SentimentLabel::Positive, 0.8),
                            analyzed(SourceKind::News, "Apple faces probe", SentimentLabel::Negative, -0.5),
                        ],
                    }],
                    warnings: Vec::new(),
                },
                TickerReport {
                    ticker: "MSFT".to_string(),
                    sections: Vec::new(),
                    warnings: vec!["No recent news found for MSFT.".to_string()],
                },
            ],
        };

        let text = render_sentiment_report(&report);
        assert!(text.contains("Recent News and Sentiment Analysis for AAPL"));
        assert!(text.contains("- Apple beats estimates"));
        assert!(text.contains("Sentiment: Positive, Score: 0.80"));
        assert!(text.contains("Highlight: key point"));
        assert!(text.contains("No recent news found for MSFT."));
        assert!(text.contains("Sentiment Distribution for AAPL"));
        assert!(!text.contains("Sentiment Distribution for MSFT"));
        assert!(text.ends_with("Overall Average Sentiment Score: 0.15"));
    }

    #[test]
    fn test_overview_report_headings() {
        let report = SentimentReport {
            kind: ReportKind::Overview,
            tickers: vec![TickerReport {
                ticker: "AAPL".to_string(),
                sections: vec![SourceSection {
                    kind: SourceKind::SocialPost,
                    items: vec![analyzed(SourceKind::SocialPost, "AAPL to the moon", SentimentLabel::Positive, 0.9)],
                }],
                warnings: vec!["No news articles found for AAPL.".to_string()],
            }],
        };

        let text = render_sentiment_report(&report);
        assert!(text.contains("=== Sentiment Analysis for AAPL ==="));
        assert!(text.contains("## Social Media Sentiment"));
        assert!(text.contains("Post: AAPL to the moon"));
        assert!(text.ends_with("Overall Average Sentiment Score: 0.90"));
    }

    #[test]
    fn test_empty_report_average() {
        let report = SentimentReport {
            kind: ReportKind::News,
            tickers: Vec::new(),
        };
        assert!(render_sentiment_report(&report).ends_with("Overall Average Sentiment Score: 0.00"));
    }

    #[test]
    fn test_price_rendering() {
        let mut frame = PriceFrame::new();
        let bars: Vec<PriceBar> = (1..=3)
            .map(|d| {
                let close = 100.0 + f64::from(d);
                PriceBar {
                    timestamp: NaiveDate::from_ymd_opt(2024, 5, d)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap()
                        .and_utc(),
                    open: close,
                    high: close,
                    low: close,
                    close,
                    volume: 10,
                }
            })
            .collect();
        frame.add_series("AAPL", &bars);

        let report = PriceReport {
            requested: vec!["AAPL".to_string(), "ZZZZ".to_string()],
            frame,
            failures: vec!["Error fetching prices for ZZZZ: no data found".to_string()],
        };

        let text = render_prices(&report);
        assert!(text.contains("❌ Error fetching prices for ZZZZ"));
        assert!(text.contains("2024-05-03"));
        assert!(text.contains("103.00"));
        assert!(text.contains("+2.0%"));
        assert!(text.ends_with("Showing stock data for: AAPL, ZZZZ"));
    }

    #[test]
    fn test_transcript() {
        let mut conversation = Conversation::new();
        assert_eq!(render_transcript(&conversation), "No messages yet.");

        conversation.append(ConversationTurn::user("What is the ticker of Tesla?"));
        conversation.append(ConversationTurn::assistant("TSLA"));
        assert_eq!(
            render_transcript(&conversation),
            "You: What is the ticker of Tesla?\nBot: TSLA"
        );
    }
}
