//! Sentiment labels and per-item classification results

use crate::error::CoreError;
use crate::item::TextItem;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Categorical judgment of tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    /// Classification failed; no judgment was made
    Error,
}

impl SentimentLabel {
    /// All labels, in display order
    pub const ALL: [SentimentLabel; 4] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
        SentimentLabel::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Error => "Error",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the three judgment labels, case-insensitively
///
/// `Error` is not parseable; it only comes from failed service calls.
impl FromStr for SentimentLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            _ => Err(CoreError::UnknownLabel(s.to_string())),
        }
    }
}

/// Outcome of classifying one text item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    label: SentimentLabel,
    score: f64,
    highlight: String,
}

impl ClassificationResult {
    /// Highlight reported when the service call failed
    pub const ERROR_HIGHLIGHT: &'static str = "Error extracting highlight";

    /// Create a result; the score is clamped to [-1.0, 1.0] and non-finite
    /// scores become 0.0
    pub fn new(label: SentimentLabel, score: f64, highlight: impl Into<String>) -> Self {
        let score = if score.is_finite() {
            score.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            label,
            score,
            highlight: highlight.into(),
        }
    }

    /// Sentinel result for a failed service call
    pub fn service_error() -> Self {
        Self::new(SentimentLabel::Error, 0.0, Self::ERROR_HIGHLIGHT)
    }

    pub fn label(&self) -> SentimentLabel {
        self.label
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn highlight(&self) -> &str {
        &self.highlight
    }

    pub fn is_error(&self) -> bool {
        self.label == SentimentLabel::Error
    }
}

/// A text item paired with its classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedItem {
    pub item: TextItem,
    pub result: ClassificationResult,
}

impl ClassifiedItem {
    pub fn new(item: TextItem, result: ClassificationResult) -> Self {
        Self { item, result }
    }
}
