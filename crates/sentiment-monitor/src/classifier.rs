//! Language-model sentiment classification of text items

use crate::error::MonitorError;
use crate::prompts::SENTIMENT_ANALYST_PROMPT;
use futures::stream::{self, StreamExt};
use sentiment_core::{ClassificationResult, SentimentLabel, TextItem};
use sentiment_llm::{CompletionRequest, LLMError, LLMProvider};
use std::sync::Arc;
use tracing::instrument;

/// Highlight used when the reply carries none
pub const NO_HIGHLIGHT: &str = "No highlight available";

/// Result of classifying one text
///
/// `result` is always well formed. `error` is set when the language-model
/// call failed, in which case `result` is the Error sentinel.
#[derive(Debug)]
pub struct ClassificationOutcome {
    pub result: ClassificationResult,
    pub error: Option<MonitorError>,
}

impl ClassificationOutcome {
    fn ok(result: ClassificationResult) -> Self {
        Self { result, error: None }
    }

    fn failed(error: MonitorError) -> Self {
        Self {
            result: ClassificationResult::service_error(),
            error: Some(error),
        }
    }
}

/// Classifies text sentiment with one completion call per text
pub struct TextClassifier {
    provider: Arc<dyn LLMProvider>,
    model: String,
    max_tokens: usize,
    temperature: f32,
}

impl TextClassifier {
    /// Create a classifier using `model` on `provider`
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens: 256,
            temperature: 0.2,
        }
    }

    /// Set maximum tokens per reply
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Model used for classification
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Classify a single text
    ///
    /// Never fails: service errors yield the Error sentinel plus the error.
    #[instrument(skip(self, text), fields(provider = self.provider.name(), chars = text.len()))]
    pub async fn classify(&self, text: &str) -> ClassificationOutcome {
        let request = CompletionRequest::builder(&self.model)
            .system(SENTIMENT_ANALYST_PROMPT)
            .user(text)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build();

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                if e.is_configuration() {
                    tracing::error!(error = %e, "Sentiment classification failed");
                } else {
                    tracing::warn!(error = %e, "Sentiment classification failed");
                }
                return ClassificationOutcome::failed(e.into());
            }
        };

        let Some(reply) = response.text() else {
            tracing::warn!("Language model returned an empty completion");
            return ClassificationOutcome::failed(
                LLMError::UnexpectedResponse("empty completion".to_string()).into(),
            );
        };

        tracing::debug!(
            tokens = response.usage.total(),
            truncated = response.is_truncated(),
            "Received classification reply"
        );
        ClassificationOutcome::ok(parse_reply(reply))
    }

    /// Classify a batch of items, preserving input order
    ///
    /// At most `concurrency` calls are in flight; 1 runs them one after
    /// another. A failed item never affects its siblings.
    pub async fn classify_batch(
        &self,
        items: Vec<TextItem>,
        concurrency: usize,
    ) -> Vec<(TextItem, ClassificationOutcome)> {
        tracing::debug!(items = items.len(), concurrency, "Classifying batch");

        stream::iter(items)
            .map(|item| async move {
                let outcome = self.classify(item.body()).await;
                (item, outcome)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}

/// Parse a `Sentiment:` / `Score:` / `Highlight:` reply
///
/// Blank lines are skipped and the first three remaining lines are read in
/// that order. A line only counts when it contains its keyword and a colon.
/// Anything unreadable falls back to Neutral, 0.0 and [`NO_HIGHLIGHT`].
pub fn parse_reply(reply: &str) -> ClassificationResult {
    let mut lines = reply.lines().map(str::trim).filter(|l| !l.is_empty());
    let label_line = lines.next();
    let score_line = lines.next();
    let highlight_line = lines.next();

    let label = label_line
        .and_then(|line| field_value(line, "sentiment"))
        .and_then(parse_label)
        .unwrap_or_else(|| {
            tracing::debug!(line = ?label_line, "Unreadable sentiment, using Neutral");
            SentimentLabel::Neutral
        });

    let score = score_line
        .and_then(|line| field_value(line, "score"))
        .and_then(parse_score)
        .unwrap_or_else(|| {
            tracing::debug!(line = ?score_line, "Unreadable score, using 0.0");
            0.0
        });

    let highlight = highlight_line
        .and_then(|line| field_value(line, "highlight"))
        .map(strip_emphasis)
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| {
            tracing::debug!(line = ?highlight_line, "Missing highlight");
            NO_HIGHLIGHT
        });

    ClassificationResult::new(label, score, highlight)
}

/// Value after the first colon, if the line mentions `keyword`
fn field_value<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    if !line.to_ascii_lowercase().contains(keyword) {
        return None;
    }
    line.split_once(':').map(|(_, value)| value.trim())
}

fn strip_emphasis(value: &str) -> &str {
    value
        .trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace())
        .trim()
}

fn parse_label(value: &str) -> Option<SentimentLabel> {
    let cleaned = strip_emphasis(value)
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim();
    cleaned.parse().ok()
}

fn parse_score(value: &str) -> Option<f64> {
    let token = strip_emphasis(value).split_whitespace().next()?;
    let token = token
        .trim_matches('*')
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ')'));
    token.parse::<f64>().ok()
}
