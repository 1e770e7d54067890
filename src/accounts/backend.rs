//! Capabilities consumed from the Telegram client library.
//!
//! The workflow only talks to these traits; the grammers-backed
//! implementation lives in [`crate::telegram`].

use crate::prompt::LoginPrompts;
use crate::telegram::TelegramError;

/// A freshly signed-in client and the credential that resumes it later.
#[derive(Debug)]
pub struct LoggedIn<C> {
    pub client: C,
    pub credential: String,
}

/// Creates authenticated clients.
#[allow(async_fn_in_trait)]
pub trait AccountConnector {
    /// Handle type produced by a successful login.
    type Client: AccountClient;

    /// Signs in a fresh, empty session interactively.
    ///
    /// The phone number is taken from `prompts` immediately; the login code
    /// and the 2FA password are requested only when needed. The returned
    /// credential already contains the new authorization.
    async fn login_with_phone<P: LoginPrompts>(
        &self,
        prompts: &mut P,
    ) -> Result<LoggedIn<Self::Client>, TelegramError>;

    /// Starts a client from a stored credential without prompting.
    async fn resume(&self, name: &str, credential: &str) -> Result<Self::Client, TelegramError>;
}

/// An authenticated client handle.
#[allow(async_fn_in_trait)]
pub trait AccountClient {
    /// Asks `bot` for a WebView of `url` and returns the resulting URL.
    async fn request_webview(&self, bot: &str, url: &str) -> Result<String, TelegramError>;

    /// Terminates the authorization on Telegram's side.
    async fn log_out(&self) -> Result<(), TelegramError>;

    /// Stops the client's network activity.
    fn disconnect(&self);
}
