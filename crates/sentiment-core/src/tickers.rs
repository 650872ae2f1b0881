//! Ticker list parsing

/// Maximum number of tickers analysed at once
pub const DEFAULT_MAX_TICKERS: usize = 5;

/// Parse comma-separated user input into ticker symbols
///
/// Each entry is trimmed and upper-cased, empty entries are skipped, and only
/// the first `max` entries are kept. Duplicates are kept as typed.
///
/// ```
/// use sentiment_core::parse_tickers;
///
/// assert_eq!(parse_tickers("aapl, msft", 5), vec!["AAPL", "MSFT"]);
/// ```
pub fn parse_tickers(raw: &str, max: usize) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .take(max)
        .map(str::to_uppercase)
        .collect()
}
