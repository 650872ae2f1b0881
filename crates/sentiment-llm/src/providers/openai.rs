//! Chat-completions provider for OpenAI and compatible servers
//!
//! Anything that serves `POST {api_base}/chat/completions` works here:
//! api.openai.com, LM Studio, vLLM, llama.cpp.
//!
//! ```no_run
//! use sentiment_llm::{CompletionRequest, LLMProvider};
//! use sentiment_llm::providers::{OpenAIConfig, OpenAIProvider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OpenAIConfig::local("http://localhost:1234/v1");
//!     let provider = OpenAIProvider::with_config(config)?;
//!
//!     let request = CompletionRequest::builder("gpt-3.5-turbo")
//!         .system("You are a financial analyst.")
//!         .user("Apple beats earnings estimates")
//!         .max_tokens(100)
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.message.content);
//!     Ok(())
//! }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, Role,
    StopReason, TokenUsage,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Public OpenAI endpoint
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Connection settings for a chat-completions server
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Bearer token; local servers usually need none
    pub api_key: Option<String>,

    /// Base URL without the `/chat/completions` suffix
    pub api_base: String,

    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: OPENAI_API_BASE.to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl OpenAIConfig {
    /// Hosted OpenAI with the given key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Keyless server at `api_base`
    pub fn local(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::default()
        }
    }

    /// Read `OPENAI_API_KEY` (required) and `OPENAI_API_BASE` (optional)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                LLMError::ConfigurationError("OPENAI_API_KEY is not set".to_string())
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            config.api_base = base;
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// [`LLMProvider`] over the chat-completions protocol
pub struct OpenAIProvider {
    client: Client,
    endpoint: String,
    config: OpenAIConfig,
}

impl OpenAIProvider {
    pub fn with_config(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: config.completions_url(),
            config,
        })
    }

    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(OpenAIConfig::new(api_key))
    }

    pub fn from_env() -> Result<Self> {
        Self::with_config(OpenAIConfig::from_env()?)
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    #[instrument(skip(self, request), fields(model = %request.model, endpoint = %self.endpoint))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = OpenAIRequest {
            messages: build_openai_messages(request.system, request.messages),
            model: request.model,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };
        debug!(messages = body.messages.len(), "posting chat completion");

        let mut call = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            call = call.bearer_auth(key);
        }
        let response = call.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(status_error(status, text, &body.model));
        }
        parse_openai_body(&text)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Classify a non-2xx reply
fn status_error(status: StatusCode, body: String, model: &str) -> LLMError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LLMError::AuthenticationFailed,
        StatusCode::TOO_MANY_REQUESTS => LLMError::RateLimitExceeded(body),
        StatusCode::BAD_REQUEST => LLMError::InvalidRequest(body),
        StatusCode::NOT_FOUND => LLMError::ModelNotFound(model.to_string()),
        _ => LLMError::RequestFailed(format!("HTTP {status}: {body}")),
    }
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

/// Build OpenAI messages from our generic format
///
/// The system prompt goes first in the messages array.
fn build_openai_messages(system: Option<String>, messages: Vec<Message>) -> Vec<OpenAIMessage> {
    system
        .map(|sys| OpenAIMessage {
            role: Role::System.as_str(),
            content: sys,
        })
        .into_iter()
        .chain(messages.into_iter().map(|msg| OpenAIMessage {
            role: msg.role.as_str(),
            content: msg.content,
        }))
        .collect()
}

/// Parse a raw chat-completions body into a completion response
fn parse_openai_body(body: &str) -> Result<CompletionResponse> {
    let openai_response: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

    // OpenAI can return multiple choices but we use the first
    let choice = openai_response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::UnexpectedResponse("No choices in response".to_string()))?;

    let usage = openai_response
        .usage
        .map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    let stop_reason = map_stop_reason(choice.finish_reason.as_deref().unwrap_or("stop"));
    debug!(
        "Received response - stop_reason: {:?}, tokens: {}/{}",
        stop_reason, usage.prompt_tokens, usage.completion_tokens
    );

    Ok(CompletionResponse {
        message: Message::assistant(choice.message.content.unwrap_or_default()),
        stop_reason,
        usage,
    })
}

/// Map OpenAI stop reason to our format
fn map_stop_reason(reason: &str) -> StopReason {
    match reason {
        "stop" => StopReason::EndTurn,
        "length" => StopReason::MaxTokens,
        "content_filter" => StopReason::ContentFilter,
        other => {
            debug!(finish_reason = other, "unrecognised finish reason, treating as end of turn");
            StopReason::EndTurn
        }
    }
}
