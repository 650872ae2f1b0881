//! Completion request and response types

use crate::Message;
use serde::{Deserialize, Serialize};

/// One-shot completion request: an optional system prompt plus messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (provider-specific)
    pub model: String,

    /// Conversation messages (user/assistant)
    pub messages: Vec<Message>,

    /// Optional system prompt, sent ahead of the messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Maximum tokens to generate
    pub max_tokens: usize,

    /// Sampling temperature (0.0-2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Response from LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated message from the assistant
    pub message: Message,

    /// Why generation stopped
    pub stop_reason: StopReason,

    /// Token accounting reported by the provider
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Generated text, `None` when the completion is blank
    pub fn text(&self) -> Option<&str> {
        self.message.text()
    }

    /// Whether the reply was cut short by the token limit or a filter
    pub fn is_truncated(&self) -> bool {
        matches!(
            self.stop_reason,
            StopReason::MaxTokens | StopReason::ContentFilter
        )
    }
}

/// Reason the LLM stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural completion
    EndTurn,

    /// Hit max tokens limit
    MaxTokens,

    /// Output withheld by the provider's content filter
    ContentFilter,
}

/// Token usage as reported by OpenAI-compatible servers
///
/// Servers that omit the `usage` block yield zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
}

impl TokenUsage {
    pub fn total(&self) -> usize {
        self.prompt_tokens + self.completion_tokens
    }
}

impl CompletionRequest {
    /// Create a builder for completion requests
    pub fn builder(model: impl Into<String>) -> CompletionRequestBuilder {
        CompletionRequestBuilder::new(model)
    }
}

/// Builder for CompletionRequest
pub struct CompletionRequestBuilder {
    request: CompletionRequest,
}

impl CompletionRequestBuilder {
    /// Create a new builder with a 1024-token limit and provider-default
    /// temperature
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            request: CompletionRequest {
                model: model.into(),
                messages: Vec::new(),
                system: None,
                max_tokens: 1024,
                temperature: None,
            },
        }
    }

    /// Replace the conversation messages
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.request.messages = messages;
        self
    }

    /// Append a user message
    pub fn user(mut self, text: impl Into<String>) -> Self {
        self.request.messages.push(Message::user(text));
        self
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.request.system = Some(system.into());
        self
    }

    /// Set the maximum tokens
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.request.max_tokens = max_tokens;
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.request.temperature = Some(temperature);
        self
    }

    /// Build the completion request
    pub fn build(self) -> CompletionRequest {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;

    #[test]
    fn test_builder() {
        let request = CompletionRequest::builder("gpt-3.5-turbo")
            .system("You are a financial analyst")
            .user("Apple beats estimates")
            .max_tokens(256)
            .temperature(0.2)
            .build();

        assert_eq!(request.model, "gpt-3.5-turbo");
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);
        assert_eq!(request.system.as_deref(), Some("You are a financial analyst"));
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.temperature, Some(0.2));
    }

    #[test]
    fn test_builder_defaults() {
        let request = CompletionRequest::builder("m").build();
        assert_eq!(request.max_tokens, 1024);
        assert!(request.system.is_none());
        assert!(request.temperature.is_none());
        assert!(request.messages.is_empty());
    }

    #[test]
    fn test_response_helpers() {
        let response = CompletionResponse {
            message: Message::assistant("  "),
            stop_reason: StopReason::MaxTokens,
            usage: TokenUsage {
                prompt_tokens: 100,
                completion_tokens: 50,
            },
        };
        assert_eq!(response.text(), None);
        assert!(response.is_truncated());
        assert_eq!(response.usage.total(), 150);
    }
}
