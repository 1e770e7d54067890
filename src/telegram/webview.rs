//! Extraction of the init data embedded in a WebView URL.
//!
//! Telegram answers `messages.requestWebView` with a URL such as
//! `https://example.org/app#tgWebAppData=query_id%3D...&tgWebAppVersion=7.0`.
//! The payload is the value of the first fragment field, percent-decoded.

use percent_encoding::percent_decode_str;

/// Errors raised when a WebView URL does not have the expected shape.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WebViewError {
    #[error("WebView URL has no fragment")]
    MissingFragment,

    #[error("First fragment field has no value")]
    MissingValue,

    #[error("Payload is not valid UTF-8 after decoding")]
    InvalidUtf8,
}

/// Returns the decoded value of the first `key=value` field of the fragment.
pub fn extract_webapp_data(url: &str) -> Result<String, WebViewError> {
    let (_, fragment) = url.split_once('#').ok_or(WebViewError::MissingFragment)?;
    let first_field = fragment.split('&').next().unwrap_or_default();
    let value = first_field
        .split('=')
        .nth(1)
        .ok_or(WebViewError::MissingValue)?;

    percent_decode_str(value)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| WebViewError::InvalidUtf8)
}
