//! Clients for the external collaborators: market data and the chat backend

pub mod chat;
pub mod market;
pub mod yahoo;

pub use chat::{ChatBackend, ChatReply, HttpChatClient, NO_RESPONSE_FALLBACK};
pub use market::{CachedMarketData, MarketDataSource, NewsHeadline, PriceBar};
pub use yahoo::YahooFinanceClient;
