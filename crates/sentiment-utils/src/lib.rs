//! Shared utilities for the sentiment monitor
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup and environment-driven configuration helpers.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, LogFormat, env_or, env_parse, load_env};
pub use logging::init_tracing;
