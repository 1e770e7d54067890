//! Configuration module for the query ID bot.
//!
//! Handles loading and validation of Telegram API credentials and the
//! runtime settings of the interactive workflow.

mod settings;

pub use settings::{AppSettings, ConfigError, TelegramConfig};
