//! Command parsing for the dashboard prompt

use crate::error::{MonitorError, Result};

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch and chart closing prices; tickers default to the last price input
    Prices { tickers: Option<String> },
    /// Replace the ticker selection used by the sentiment flows
    Select { tickers: String },
    /// Show the current ticker selection
    Selection,
    /// Classify recent news for the selected tickers
    News,
    /// Classify news, social posts and reports for the selected tickers
    Overall,
    /// Replay the chat transcript
    History,
    /// Show help
    Help,
    /// Exit the dashboard
    Exit,
    /// Free-form question for the chat backend (not a command)
    Chat { text: String },
}

impl Command {
    /// Parse a command from user input
    ///
    /// Input starting with `/` is a command; anything else is a chat message.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(MonitorError::CommandError("Empty input".to_string()));
        }

        let Some(command_line) = input.strip_prefix('/') else {
            return Ok(Command::Chat {
                text: input.to_string(),
            });
        };

        let (cmd, args) = command_line
            .split_once(char::is_whitespace)
            .map_or((command_line, ""), |(cmd, rest)| (cmd, rest.trim()));
        if cmd.is_empty() {
            return Err(MonitorError::CommandError("Empty command".to_string()));
        }

        let cmd = cmd.to_lowercase();
        match cmd.as_str() {
            "prices" | "price" | "p" => Ok(Command::Prices {
                tickers: (!args.is_empty()).then(|| args.to_string()),
            }),
            "select" | "s" => {
                if args.is_empty() {
                    return Err(MonitorError::CommandError(
                        "Missing tickers for select command".to_string(),
                    ));
                }
                Ok(Command::Select {
                    tickers: args.to_string(),
                })
            }
            "selection" | "sel" => Ok(Command::Selection),
            "news" | "n" => Ok(Command::News),
            "overall" | "o" => Ok(Command::Overall),
            "history" | "transcript" => Ok(Command::History),
            "help" | "h" | "?" => Ok(Command::Help),
            "exit" | "quit" | "q" => Ok(Command::Exit),
            _ => Err(MonitorError::CommandError(format!("Unknown command: {cmd}"))),
        }
    }

    /// Get help text for all commands
    pub fn help_text() -> &'static str {
        r"
Market Sentiment Monitor Commands
=================================

Market Data:
  /prices [T1, T2, ...]  Fetch closing prices (default: last input)

Stock Selection:
  /select T1, T2, ...    Set the selected stocks (max 5)
  /selection             Show the selected stocks

Sentiment Analysis:
  /news                  Analyze sentiment of recent news
  /overall               Analyze news, social media and financial reports

Chat:
  <any text>             Ask a question (e.g. what is the ticker of a firm?)
  /history               Show the chat transcript

Other Commands:
  /help                  Show help
  /exit                  Exit

Command Aliases:
  /p = /prices   /s = /select   /n = /news   /o = /overall   /q = /exit
"
    }

    /// Get a short description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Command::Prices { .. } => "Fetch stock prices",
            Command::Select { .. } => "Set selected stocks",
            Command::Selection => "Show selected stocks",
            Command::News => "News sentiment analysis",
            Command::Overall => "Overall sentiment analysis",
            Command::History => "Chat transcript",
            Command::Help => "Show help",
            Command::Exit => "Exit the dashboard",
            Command::Chat { .. } => "Chat question",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prices() {
        assert_eq!(
            Command::parse("/prices AAPL, MSFT, NVDA").unwrap(),
            Command::Prices {
                tickers: Some("AAPL, MSFT, NVDA".to_string())
            }
        );
        assert_eq!(
            Command::parse("/p").unwrap(),
            Command::Prices { tickers: None }
        );
    }

    #[test]
    fn test_parse_select_keeps_raw_list() {
        assert_eq!(
            Command::parse("/select  tsla,amd ").unwrap(),
            Command::Select {
                tickers: "tsla,amd".to_string()
            }
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("/news").unwrap(), Command::News);
        assert_eq!(Command::parse("/O").unwrap(), Command::Overall);
        assert_eq!(Command::parse("/history").unwrap(), Command::History);
        assert_eq!(Command::parse("/sel").unwrap(), Command::Selection);
        assert_eq!(Command::parse("/?").unwrap(), Command::Help);
        assert_eq!(Command::parse("/quit").unwrap(), Command::Exit);
    }

    #[test]
    fn test_parse_chat() {
        let cmd = Command::parse("  What is the ticker of Nvidia?  ").unwrap();
        assert_eq!(
            cmd,
            Command::Chat {
                text: "What is the ticker of Nvidia?".to_string()
            }
        );
        assert_eq!(cmd.description(), "Chat question");
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("/").is_err());
        assert!(Command::parse("/select").is_err());

        let err = Command::parse("/frobnicate").unwrap_err();
        assert_eq!(err.to_string(), "Command error: Unknown command: frobnicate");
    }

    #[test]
    fn test_help_lists_commands() {
        let help = Command::help_text();
        for cmd in ["/prices", "/select", "/news", "/overall", "/history", "/exit"] {
            assert!(help.contains(cmd), "missing {cmd}");
        }
    }
}
