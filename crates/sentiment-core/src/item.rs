//! Raw text items produced by collectors

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Where a piece of text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// News headline from the market-data feed
    News,
    /// Social media post
    SocialPost,
    /// Financial report snippet
    Report,
    /// Free-form question typed into the chat panel
    ChatQuery,
}

impl SourceKind {
    /// Display heading used when listing items of this kind
    pub fn heading(self) -> &'static str {
        match self {
            SourceKind::News => "News Sentiment",
            SourceKind::SocialPost => "Social Media Sentiment",
            SourceKind::Report => "Financial Reports Sentiment",
            SourceKind::ChatQuery => "Chat",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::News => "News",
            SourceKind::SocialPost => "Post",
            SourceKind::Report => "Report",
            SourceKind::ChatQuery => "Question",
        };
        f.write_str(name)
    }
}

/// A unit of text to classify
///
/// Fields are private so an item cannot change after a collector hands it
/// over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextItem {
    source_kind: SourceKind,
    ticker: Option<String>,
    body: String,
    origin_link: Option<Url>,
}

impl TextItem {
    /// Create an item with no ticker or link
    pub fn new(source_kind: SourceKind, body: impl Into<String>) -> Self {
        Self {
            source_kind,
            ticker: None,
            body: body.into(),
            origin_link: None,
        }
    }

    /// Attach the ticker this item is about
    pub fn for_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// Attach an already parsed origin link
    pub fn with_link(mut self, link: Url) -> Self {
        self.origin_link = Some(link);
        self
    }

    /// Parse and attach an origin link
    pub fn try_with_link(self, link: &str) -> Result<Self> {
        let url = Url::parse(link.trim()).map_err(|e| CoreError::InvalidLink {
            link: link.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.with_link(url))
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn origin_link(&self) -> Option<&Url> {
        self.origin_link.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let item = TextItem::new(SourceKind::News, "Apple beats estimates")
            .for_ticker("AAPL")
            .try_with_link("https://finance.yahoo.com/news/apple")
            .unwrap();

        assert_eq!(item.source_kind(), SourceKind::News);
        assert_eq!(item.ticker(), Some("AAPL"));
        assert_eq!(item.body(), "Apple beats estimates");
        assert_eq!(
            item.origin_link().map(Url::as_str),
            Some("https://finance.yahoo.com/news/apple")
        );
    }

    #[test]
    fn test_invalid_link() {
        let err = TextItem::new(SourceKind::News, "x")
            .try_with_link("not a url")
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidLink { .. }));
    }

    #[test]
    fn test_source_kind_display() {
        assert_eq!(SourceKind::SocialPost.to_string(), "Post");
        assert_eq!(SourceKind::Report.heading(), "Financial Reports Sentiment");
    }
}
