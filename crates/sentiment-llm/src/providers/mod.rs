//! Concrete LLM provider implementations
//!
//! This module contains implementations of the LLMProvider trait for
//! the supported services.

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::{OPENAI_API_BASE, OpenAIConfig, OpenAIProvider};
