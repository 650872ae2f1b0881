//! Per-session state of the dashboard

use crate::api::ChatBackend;
use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::pipeline::{ReportKind, SentimentReport};
use chrono::{DateTime, Utc};
use sentiment_core::{Conversation, ConversationTurn, parse_tickers};
use tracing::instrument;

/// State that lives for one dashboard session
///
/// Created at start-up and dropped on exit. Holds the chat conversation, the
/// ticker inputs and the most recent sentiment reports.
#[derive(Debug)]
pub struct SessionContext {
    conversation: Conversation,
    selection: String,
    price_input: String,
    last_news: Option<SentimentReport>,
    last_overview: Option<SentimentReport>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(config: &MonitorConfig) -> Self {
        let now = Utc::now();
        Self {
            conversation: Conversation::new(),
            selection: config.default_selection.clone(),
            price_input: config.default_price_tickers.clone(),
            last_news: None,
            last_overview: None,
            created_at: now,
            last_active: now,
        }
    }

    pub fn update_activity(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Raw ticker selection used by the sentiment flows
    pub fn selection(&self) -> &str {
        &self.selection
    }

    /// Replace the ticker selection
    pub fn select_tickers(&mut self, raw: impl Into<String>) {
        self.selection = raw.into();
        self.update_activity();
    }

    /// Parsed ticker selection, at most `max` symbols
    pub fn selected_tickers(&self, max: usize) -> Vec<String> {
        parse_tickers(&self.selection, max)
    }

    /// Raw ticker input of the price flow
    pub fn price_input(&self) -> &str {
        &self.price_input
    }

    pub fn set_price_input(&mut self, raw: impl Into<String>) {
        self.price_input = raw.into();
        self.update_activity();
    }

    /// Keep `report` as the latest of its kind
    pub fn record_report(&mut self, report: SentimentReport) {
        match report.kind {
            ReportKind::News => self.last_news = Some(report),
            ReportKind::Overview => self.last_overview = Some(report),
        }
        self.update_activity();
    }

    /// Latest report of `kind`, if that flow has run
    pub fn last_report(&self, kind: ReportKind) -> Option<&SentimentReport> {
        match kind {
            ReportKind::News => self.last_news.as_ref(),
            ReportKind::Overview => self.last_overview.as_ref(),
        }
    }

    /// Send a chat message and record the exchange
    ///
    /// The user turn is always recorded. The assistant turn is recorded only
    /// when the backend answered; a reply without text records the fallback
    /// message. Returns the assistant turn.
    #[instrument(skip(self, backend, message), fields(chat_id = %self.conversation.id()))]
    pub async fn send_chat(
        &mut self,
        backend: &dyn ChatBackend,
        message: &str,
    ) -> Result<&ConversationTurn> {
        let message = message.trim();
        if message.is_empty() {
            return Err(MonitorError::CommandError(
                "chat message must not be empty".to_string(),
            ));
        }

        self.update_activity();
        self.conversation.append(ConversationTurn::user(message));

        let reply = match backend.ask(message, self.conversation.id()).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed");
                return Err(e);
            }
        };

        tracing::debug!(turns = self.conversation.len() + 1, "Chat reply recorded");
        Ok(self
            .conversation
            .append(ConversationTurn::assistant(reply.into_turn_text())))
    }
}
