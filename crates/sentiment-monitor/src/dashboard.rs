//! Interactive market sentiment dashboard
//!
//! Ties the pipeline, the chat backend and the session state to the command
//! set of the terminal prompt.
//!
//! # Example
//!
//! ```rust,ignore
//! use sentiment_monitor::{Dashboard, DashboardReply, MonitorConfig};
//!
//! let mut dashboard = Dashboard::with_provider(provider, MonitorConfig::from_env()?)?;
//! if let DashboardReply::Output(text) = dashboard.process_input("/news").await? {
//!     println!("{text}");
//! }
//! ```

use crate::api::{CachedMarketData, ChatBackend, HttpChatClient, MarketDataSource, YahooFinanceClient};
use crate::classifier::TextClassifier;
use crate::commands::Command;
use crate::config::MonitorConfig;
use crate::error::Result;
use crate::pipeline::SentimentPipeline;
use crate::render;
use crate::session::SessionContext;
use sentiment_core::parse_tickers;
use sentiment_llm::LLMProvider;
use std::sync::Arc;

/// What the prompt loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardReply {
    /// Print this text and read the next command
    Output(String),
    /// Leave the prompt loop
    Exit,
}

/// Market sentiment dashboard
pub struct Dashboard {
    pipeline: SentimentPipeline,
    chat: Arc<dyn ChatBackend>,
    session: SessionContext,
    max_tickers: usize,
    prompt: String,
}

impl Dashboard {
    /// Create a dashboard backed by Yahoo Finance, the HTTP chat backend and
    /// `provider` for classification
    pub fn with_provider(provider: Arc<dyn LLMProvider>, config: MonitorConfig) -> Result<Self> {
        config.validate()?;

        let classifier = TextClassifier::new(provider, config.model.clone())
            .with_max_tokens(config.max_tokens)
            .with_temperature(config.temperature);

        let market: Arc<dyn MarketDataSource> = Arc::new(CachedMarketData::new(
            Arc::new(YahooFinanceClient::new()),
            config.cache_ttl_prices,
            config.cache_ttl_news,
        ));

        let chat = Arc::new(HttpChatClient::new(
            config.chat_api_url.as_deref(),
            config.request_timeout,
        )?);
        if config.chat_api_url.is_none() {
            tracing::warn!("CHAT_API_URL not set; chat questions will fail");
        }

        let pipeline = SentimentPipeline::new(classifier, market, config);
        Ok(Self::from_parts(pipeline, chat))
    }

    /// Assemble a dashboard from an existing pipeline and chat backend
    pub fn from_parts(pipeline: SentimentPipeline, chat: Arc<dyn ChatBackend>) -> Self {
        let session = SessionContext::new(pipeline.config());
        let max_tickers = pipeline.config().max_tickers;
        Self {
            pipeline,
            chat,
            session,
            max_tickers,
            prompt: ">>> ".to_string(),
        }
    }

    /// Prompt shown before each command
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Session state
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Parse and execute one line of user input
    pub async fn process_input(&mut self, input: &str) -> Result<DashboardReply> {
        let command = Command::parse(input)?;
        self.execute_command(command).await
    }

    /// Run scripted input lines in order, stopping after `/exit`
    ///
    /// A failing line is returned as its `Err` and the following lines still
    /// run, as they do at the interactive prompt.
    pub async fn run_script<I, S>(&mut self, lines: I) -> Vec<Result<DashboardReply>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut replies = Vec::new();
        for line in lines {
            let line = line.as_ref();
            tracing::info!(command = line, "Running scripted command");
            let reply = self.process_input(line).await;
            let exit = matches!(reply, Ok(DashboardReply::Exit));
            replies.push(reply);
            if exit {
                break;
            }
        }
        replies
    }

    /// Execute a parsed command
    pub async fn execute_command(&mut self, command: Command) -> Result<DashboardReply> {
        tracing::debug!(command = command.description(), "Executing command");

        let output = match command {
            Command::Prices { tickers } => {
                if let Some(raw) = tickers {
                    self.session.set_price_input(raw);
                }
                let tickers = parse_tickers(self.session.price_input(), self.max_tickers);
                let report = self.pipeline.fetch_prices(&tickers).await;
                render::render_prices(&report)
            }
            Command::Select { tickers } => {
                self.session.select_tickers(tickers.as_str());
                format!("Selected stocks updated to: {tickers}")
            }
            Command::Selection => {
                let tickers = self.session.selected_tickers(self.max_tickers);
                if tickers.is_empty() {
                    "No stocks selected. Use /select T1, T2 to choose up to 5.".to_string()
                } else {
                    format!("Selected stocks: {}", tickers.join(", "))
                }
            }
            Command::News => {
                let tickers = self.session.selected_tickers(self.max_tickers);
                let report = self.pipeline.analyze_news(&tickers).await;
                let text = render::render_sentiment_report(&report);
                self.session.record_report(report);
                text
            }
            Command::Overall => {
                let tickers = self.session.selected_tickers(self.max_tickers);
                let report = self.pipeline.analyze_overview(&tickers).await;
                let text = render::render_sentiment_report(&report);
                self.session.record_report(report);
                text
            }
            Command::History => render::render_transcript(self.session.conversation()),
            Command::Help => Command::help_text().to_string(),
            Command::Exit => return Ok(DashboardReply::Exit),
            Command::Chat { text } => {
                let turn = self.session.send_chat(self.chat.as_ref(), &text).await?;
                format!("Bot: {}", turn.content)
            }
        };

        Ok(DashboardReply::Output(output))
    }
}
