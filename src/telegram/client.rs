//! Telegram client wrapper for one account.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use grammers_client::{Client, InvocationError, SenderPool, SignInError, sender};
use grammers_session::storages::SqliteSession;
use grammers_tl_types as tl;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::accounts::AccountClient;
use crate::prompt::{LoginPrompts, PromptError};
use crate::storage::sanitize_bot;

/// Errors that can occur during Telegram operations.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Not authorized. The stored session must be signed in already.")]
    NotAuthorized,

    #[error("Sign in failed: {0}")]
    SignInFailed(String),

    #[error("Invalid login code")]
    InvalidCode,

    #[error("Invalid 2FA password")]
    InvalidPassword,

    #[error("Flood wait required: {0} seconds")]
    FloodWait(u32),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid session credential: {0}")]
    InvalidCredential(String),

    #[error("Bot not found: {0}")]
    BotNotFound(String),

    #[error("API invocation error: {0}")]
    Invocation(String),

    #[error(transparent)]
    Input(#[from] PromptError),
}

impl From<InvocationError> for TelegramError {
    fn from(err: InvocationError) -> Self {
        let err_str = err.to_string();

        // Check for flood wait errors
        if (err_str.contains("FLOOD_WAIT") || err_str.contains("flood"))
            && let Some(seconds) = extract_flood_wait_seconds(&err_str)
        {
            return Self::FloodWait(seconds);
        }

        Self::Invocation(err_str)
    }
}

/// Extracts flood wait seconds from an error message.
fn extract_flood_wait_seconds(err_msg: &str) -> Option<u32> {
    let patterns = ["FLOOD_WAIT_", "flood wait "];

    for pattern in patterns {
        if let Some(idx) = err_msg.to_lowercase().find(&pattern.to_lowercase()) {
            let start = idx + pattern.len();
            let num_str: String = err_msg[start..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            if let Ok(seconds) = num_str.parse() {
                return Some(seconds);
            }
        }
    }
    None
}

/// How long [`TelegramAccount::close`] waits for the sender pool to stop.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// One connected Telegram account backed by a SQLite session file.
pub struct TelegramAccount {
    /// The underlying grammers client.
    client: Client,

    /// Handle to the sender pool for disconnection.
    handle: sender::SenderPoolHandle,

    /// Database the session is persisted in while connected.
    session_path: PathBuf,

    /// Platform reported in WebView requests.
    platform: String,

    /// Background task running the sender pool.
    pool_task: JoinHandle<()>,
}

impl TelegramAccount {
    /// Opens the session at `session_path` and connects to Telegram.
    ///
    /// A missing database is created empty.
    pub async fn connect(
        api_id: i32,
        session_path: &Path,
        platform: &str,
    ) -> Result<Self, TelegramError> {
        debug!("Opening session {}", session_path.display());

        let session = Arc::new(
            SqliteSession::open(session_path)
                .await
                .map_err(|e| TelegramError::Session(e.to_string()))?,
        );

        let SenderPool {
            runner,
            updates: _updates,
            handle,
        } = SenderPool::new(Arc::clone(&session), api_id);

        let client = Client::new(handle.clone());

        // Spawn the sender pool runner
        let pool_task = tokio::spawn(async move {
            runner.run().await;
        });

        Ok(Self {
            client,
            handle: handle.thin,
            session_path: session_path.to_path_buf(),
            platform: platform.to_owned(),
            pool_task,
        })
    }

    /// Checks if the client is authorized.
    pub async fn is_authorized(&self) -> Result<bool, TelegramError> {
        self.client
            .is_authorized()
            .await
            .map_err(|e| TelegramError::Connection(e.to_string()))
    }

    /// Runs the interactive sign-in sequence.
    ///
    /// Any failure is passed to [`LoginPrompts::on_error`] before returning.
    pub async fn sign_in<P: LoginPrompts>(
        &self,
        phone: &str,
        api_hash: &str,
        prompts: &mut P,
    ) -> Result<(), TelegramError> {
        let result = self.sign_in_steps(phone, api_hash, prompts).await;
        if let Err(e) = &result {
            prompts.on_error(e);
        }
        result
    }

    async fn sign_in_steps<P: LoginPrompts>(
        &self,
        phone: &str,
        api_hash: &str,
        prompts: &mut P,
    ) -> Result<(), TelegramError> {
        info!("Requesting login code for phone: {}...", mask_phone(phone));

        let token = self
            .client
            .request_login_code(phone, api_hash)
            .await
            .map_err(|e| TelegramError::SignInFailed(e.to_string()))?;

        let code = prompts.code()?;

        match self.client.sign_in(&token, &code).await {
            Ok(_user) => {
                info!("Successfully signed in!");
                Ok(())
            }
            Err(SignInError::PasswordRequired(password_token)) => {
                debug!("2FA password required, hint: {:?}", password_token.hint());

                let password = prompts.password(password_token.hint())?;

                match self
                    .client
                    .check_password(password_token, password.as_str())
                    .await
                {
                    Ok(_user) => {
                        info!("Successfully authenticated with 2FA!");
                        Ok(())
                    }
                    Err(SignInError::InvalidPassword(_)) => Err(TelegramError::InvalidPassword),
                    Err(e) => Err(TelegramError::SignInFailed(e.to_string())),
                }
            }
            Err(SignInError::InvalidCode) => Err(TelegramError::InvalidCode),
            Err(e) => Err(TelegramError::SignInFailed(e.to_string())),
        }
    }

    /// Resolves a bot username to the input peer and input user it needs.
    async fn resolve_bot(
        &self,
        bot: &str,
    ) -> Result<(tl::enums::InputPeer, tl::enums::InputUser), TelegramError> {
        let username = sanitize_bot(bot);
        debug!("Resolving bot @{}", username);

        let request = tl::functions::contacts::ResolveUsername {
            username: username.to_owned(),
            referer: None,
        };
        let tl::enums::contacts::ResolvedPeer::Peer(resolved) =
            self.client.invoke(&request).await?;

        let tl::enums::Peer::User(peer) = resolved.peer else {
            return Err(TelegramError::BotNotFound(username.to_owned()));
        };

        let access_hash = resolved
            .users
            .into_iter()
            .find_map(|user| match user {
                tl::enums::User::User(user) if user.id == peer.user_id && user.bot => {
                    Some(user.access_hash.unwrap_or_default())
                }
                _ => None,
            })
            .ok_or_else(|| TelegramError::BotNotFound(username.to_owned()))?;

        Ok((
            tl::enums::InputPeer::User(tl::types::InputPeerUser {
                user_id: peer.user_id,
                access_hash,
            }),
            tl::enums::InputUser::User(tl::types::InputUser {
                user_id: peer.user_id,
                access_hash,
            }),
        ))
    }

    /// Requests a WebView for `url` from `bot` and returns the URL Telegram
    /// hands back.
    pub async fn request_webview(&self, bot: &str, url: &str) -> Result<String, TelegramError> {
        let (peer, bot_user) = self.resolve_bot(bot).await?;

        let request = tl::functions::messages::RequestWebView {
            from_bot_menu: false,
            silent: false,
            compact: false,
            fullscreen: false,
            peer,
            bot: bot_user,
            url: Some(url.to_owned()),
            start_param: None,
            theme_params: None,
            platform: self.platform.clone(),
            reply_to: None,
            send_as: None,
        };

        match self.client.invoke(&request).await? {
            tl::enums::WebViewResult::Url(result) => {
                debug!("WebView URL received ({} chars)", result.url.len());
                Ok(result.url)
            }
        }
    }

    /// Logs the account out on Telegram's side.
    pub async fn log_out(&self) -> Result<(), TelegramError> {
        self.client
            .invoke(&tl::functions::auth::LogOut {})
            .await
            .map(|_| ())
            .map_err(Into::into)
    }

    /// Disconnects from Telegram.
    pub fn disconnect(&self) {
        debug!("Disconnecting from Telegram...");
        self.handle.quit();
    }

    /// Stops the sender pool and releases the session database.
    ///
    /// Once this returns no connection to the database is open, so the file
    /// at the returned path holds every committed write.
    pub async fn close(self) -> PathBuf {
        let Self {
            client,
            handle,
            session_path,
            mut pool_task,
            ..
        } = self;

        handle.quit();
        if tokio::time::timeout(CLOSE_TIMEOUT, &mut pool_task)
            .await
            .is_err()
        {
            warn!("Sender pool did not stop in time; aborting it");
            pool_task.abort();
            let _ = pool_task.await;
        }

        drop(client);
        drop(handle);
        debug!("Closed session {}", session_path.display());
        session_path
    }
}

impl AccountClient for TelegramAccount {
    async fn request_webview(&self, bot: &str, url: &str) -> Result<String, TelegramError> {
        Self::request_webview(self, bot, url).await
    }

    async fn log_out(&self) -> Result<(), TelegramError> {
        Self::log_out(self).await
    }

    fn disconnect(&self) {
        Self::disconnect(self);
    }
}

impl std::fmt::Debug for TelegramAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramAccount")
            .field("session_path", &self.session_path)
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

/// Masks a phone number for logging (shows last 4 digits).
pub(crate) fn mask_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() > 4 {
        format!("***{}", &digits[digits.len() - 4..])
    } else {
        "****".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("+1234567890"), "***7890");
        assert_eq!(mask_phone("123"), "****");
        assert_eq!(mask_phone("+7 (999) 123-45-67"), "***4567");
    }

    #[test]
    fn test_extract_flood_wait() {
        assert_eq!(extract_flood_wait_seconds("FLOOD_WAIT_120"), Some(120));
        assert_eq!(extract_flood_wait_seconds("flood wait 60 seconds"), Some(60));
        assert_eq!(extract_flood_wait_seconds("some other error"), None);
    }

    #[test]
    fn test_prompt_error_converts() {
        let err: TelegramError = PromptError::Closed.into();
        assert!(matches!(err, TelegramError::Input(PromptError::Closed)));
    }
}
