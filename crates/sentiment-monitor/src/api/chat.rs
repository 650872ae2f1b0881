//! Client for the external question-answering chat endpoint

use crate::error::{MonitorError, Result};
use async_trait::async_trait;
use sentiment_core::ConversationId;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;
use url::Url;

/// Assistant text used when the chat reply carries no `text` field
pub const NO_RESPONSE_FALLBACK: &str = "No response from the bot.";

/// Reply from the chat backend
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatReply {
    /// Answer text, absent when the payload lacked it
    pub text: Option<String>,
}

impl ChatReply {
    /// Text to record as the assistant turn
    pub fn into_turn_text(self) -> String {
        self.text
            .unwrap_or_else(|| NO_RESPONSE_FALLBACK.to_string())
    }
}

/// Question-answering backend for the chat panel
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Ask `question` within the conversation identified by `chat_id`
    async fn ask(&self, question: &str, chat_id: ConversationId) -> Result<ChatReply>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    question: &'a str,
    chat_id: String,
}

/// HTTP chat client posting `{question, chatId}` JSON
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: reqwest::Client,
    endpoint: Option<Url>,
}

impl HttpChatClient {
    /// Create a client for `endpoint`
    ///
    /// A missing endpoint is accepted; every question then fails with a chat
    /// service error instead of aborting the dashboard.
    pub fn new(endpoint: Option<&str>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint
            .map(|raw| {
                Url::parse(raw)
                    .map_err(|e| MonitorError::ConfigError(format!("invalid chat endpoint {raw:?}: {e}")))
            })
            .transpose()?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoint })
    }

    /// Configured endpoint, if any
    pub fn endpoint(&self) -> Option<&Url> {
        self.endpoint.as_ref()
    }
}

#[async_trait]
impl ChatBackend for HttpChatClient {
    #[instrument(skip(self, question), fields(chat_id = %chat_id))]
    async fn ask(&self, question: &str, chat_id: ConversationId) -> Result<ChatReply> {
        let endpoint = self
            .endpoint
            .clone()
            .ok_or_else(|| MonitorError::ChatService("chat endpoint is not configured".to_string()))?;

        let request = ChatRequest {
            question,
            chat_id: chat_id.to_string(),
        };

        let response = self
            .client
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| MonitorError::ChatService(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MonitorError::ChatService(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(%status, "Chat endpoint returned an error status");
            return Err(MonitorError::ChatService(format!("HTTP {status}: {body}")));
        }

        parse_chat_body(&body)
    }
}

/// Extract the reply from a chat response body
///
/// A string `text` is taken as is, null or missing yields no text, and any
/// other JSON value is rendered to a string.
pub fn parse_chat_body(body: &str) -> Result<ChatReply> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| MonitorError::ChatService(format!("invalid response body: {e}")))?;

    let text = match value.get("text") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    Ok(ChatReply { text })
}
