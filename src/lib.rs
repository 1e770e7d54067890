//! Query ID Bot Library
//!
//! A Telegram multi-account utility that collects bot WebView init data.
//!
//! This crate provides the core functionality for:
//! - Signing accounts in by phone number or from saved session files
//! - Persisting session credentials and WebView results as flat files
//! - Requesting a bot's WebView for every logged-in account
//! - Driving everything from an interactive terminal menu

pub mod accounts;
pub mod config;
pub mod prompt;
pub mod storage;
pub mod telegram;
pub mod workflow;
