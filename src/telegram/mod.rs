//! Telegram client wrapper module.
//!
//! Provides the grammers-backed account handle, the connector that signs
//! accounts in, and WebView payload extraction.

mod client;
mod connector;
mod webview;

pub use client::{TelegramAccount, TelegramError};
pub use connector::GrammersConnector;
pub use webview::{WebViewError, extract_webapp_data};
