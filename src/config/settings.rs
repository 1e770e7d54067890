//! Application settings and Telegram configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Telegram API configuration.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Telegram API ID (obtain from <https://my.telegram.org>).
    pub api_id: i32,

    /// Telegram API hash (obtain from <https://my.telegram.org>).
    pub api_hash: String,
}

impl TelegramConfig {
    /// Creates a new Telegram configuration.
    #[must_use]
    pub const fn new(api_id: i32, api_hash: String) -> Self {
        Self { api_id, api_hash }
    }

    /// Creates configuration from environment variables.
    ///
    /// Expects `TG_API_ID` and `TG_API_HASH` to be set. The unprefixed
    /// `API_ID` and `API_HASH` are accepted as fallbacks.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_id = env_with_fallback("TG_API_ID", "API_ID")
            .ok_or(ConfigError::MissingEnvVar("TG_API_ID"))?;
        let api_hash = env_with_fallback("TG_API_HASH", "API_HASH")
            .ok_or(ConfigError::MissingEnvVar("TG_API_HASH"))?;

        Self::parse(&api_id, api_hash)
    }

    /// Validates raw configuration values.
    fn parse(api_id: &str, api_hash: String) -> Result<Self, ConfigError> {
        let api_id: i32 = api_id
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidApiId)?;
        if api_id <= 0 {
            return Err(ConfigError::InvalidApiId);
        }

        let api_hash = api_hash.trim().to_owned();
        if api_hash.is_empty() {
            return Err(ConfigError::EmptyApiHash);
        }

        Ok(Self { api_id, api_hash })
    }
}

fn env_with_fallback(primary: &str, fallback: &str) -> Option<String> {
    std::env::var(primary)
        .or_else(|_| std::env::var(fallback))
        .ok()
}

/// Runtime settings for the interactive workflow.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Directory holding `<digits>.session` credential files.
    pub sessions_dir: PathBuf,

    /// Directory holding `<bot>.txt` WebView result files.
    pub results_dir: PathBuf,

    /// Pause before starting each client restored from a session file.
    pub login_delay_secs: u64,

    /// Platform reported to Telegram when requesting a WebView.
    pub webview_platform: String,
}

fn default_sessions_dir() -> PathBuf {
    PathBuf::from("sessions")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("webview_results")
}

fn default_login_delay() -> u64 {
    5 // avoids anti-abuse limits on rapid reconnects
}

fn default_platform() -> String {
    "android".to_owned()
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            sessions_dir: default_sessions_dir(),
            results_dir: default_results_dir(),
            login_delay_secs: default_login_delay(),
            webview_platform: default_platform(),
        }
    }
}

impl AppSettings {
    /// Creates settings from environment variables with defaults.
    #[must_use]
    pub fn from_env_with_defaults() -> Self {
        Self {
            sessions_dir: std::env::var("SESSIONS_DIR")
                .map_or_else(|_| default_sessions_dir(), PathBuf::from),
            results_dir: std::env::var("RESULTS_DIR")
                .map_or_else(|_| default_results_dir(), PathBuf::from),
            login_delay_secs: std::env::var("SESSION_LOGIN_DELAY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_login_delay),
            webview_platform: std::env::var("WEBVIEW_PLATFORM")
                .unwrap_or_else(|_| default_platform()),
        }
    }

    /// Returns the login delay as a [`Duration`].
    #[must_use]
    pub const fn login_delay(&self) -> Duration {
        Duration::from_secs(self.login_delay_secs)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid API ID format (must be a positive integer)")]
    InvalidApiId,

    #[error("API hash must not be empty")]
    EmptyApiHash,
}
