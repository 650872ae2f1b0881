//! Core data model for the sentiment monitor
//!
//! This crate defines the types that flow between the collectors, the
//! classifier and the display layer, plus the two pieces of pure logic that
//! sit on top of them:
//!
//! - [`summarize`]: label counts and mean score over a batch of results
//! - [`Conversation`]: the append-only chat log of one session
//!
//! # Example
//!
//! ```
//! use sentiment_core::{ClassificationResult, SentimentLabel, summarize};
//!
//! let results = vec![
//!     ClassificationResult::new(SentimentLabel::Positive, 0.8, "strong growth"),
//!     ClassificationResult::new(SentimentLabel::Negative, -0.4, "margin pressure"),
//! ];
//!
//! let summary = summarize(&results);
//! assert_eq!(summary.count(SentimentLabel::Positive), 1);
//! assert!((summary.mean_score() - 0.2).abs() < 1e-9);
//! ```

pub mod classification;
pub mod conversation;
pub mod error;
pub mod item;
pub mod summary;
pub mod tickers;

pub use classification::{ClassificationResult, ClassifiedItem, SentimentLabel};
pub use conversation::{Conversation, ConversationId, ConversationTurn, TurnRole};
pub use error::{CoreError, Result};
pub use item::{SourceKind, TextItem};
pub use summary::{SentimentSummary, summarize};
pub use tickers::{DEFAULT_MAX_TICKERS, parse_tickers};
