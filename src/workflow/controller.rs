//! The interactive menu loop and its four operations.
//!
//! Accounts are always processed one at a time, in registration order. A
//! failure is reported and confined to the account or file it happened on;
//! only filesystem errors on the stores end the current operation.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::menu::{MenuChoice, SessionSelection};
use crate::accounts::{AccountClient, AccountConnector, AccountRegistry, LoggedIn};
use crate::prompt::{PromptError, PromptedLogin, Prompter};
use crate::storage::{ResultStore, SessionStore, StoreError, is_blank_credential};
use crate::telegram::{TelegramError, WebViewError, extract_webapp_data};

/// Errors that end a single menu operation.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure while collecting the WebView payload of one account.
#[derive(Debug, thiserror::Error)]
enum AccountStepError {
    #[error(transparent)]
    Telegram(#[from] TelegramError),

    #[error("Unexpected WebView URL: {0}")]
    Decode(#[from] WebViewError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns every piece of state the menu operations share.
pub struct Workflow<C: AccountConnector, P: Prompter> {
    connector: C,
    prompter: P,
    sessions: SessionStore,
    results: ResultStore,
    registry: AccountRegistry<C::Client>,
    login_delay: Duration,
}

impl<C: AccountConnector, P: Prompter> Workflow<C, P> {
    /// Creates a workflow with no accounts and a five second login delay.
    pub fn new(connector: C, prompter: P, sessions: SessionStore, results: ResultStore) -> Self {
        Self {
            connector,
            prompter,
            sessions,
            results,
            registry: AccountRegistry::new(),
            login_delay: Duration::from_secs(5),
        }
    }

    /// Sets the pause taken before each session-file login.
    #[must_use]
    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    /// Accounts logged in so far.
    pub fn accounts(&self) -> &AccountRegistry<C::Client> {
        &self.registry
    }

    /// Runs the menu until the operator exits or input ends.
    pub async fn run(mut self) -> Result<(), WorkflowError> {
        loop {
            for choice in MenuChoice::ALL {
                println!("{choice}");
            }

            let answer = match self.prompter.ask("Please select an option (1/2/3/4)") {
                Ok(answer) => answer,
                Err(PromptError::Closed) => {
                    self.close_on_eof();
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            let Some(choice) = MenuChoice::parse(&answer) else {
                println!("Invalid option. Please try again.");
                continue;
            };

            let result = match choice {
                MenuChoice::LoginWithPhone => self.login_with_phone().await,
                MenuChoice::LoginWithSessionFile => self.login_with_session_file().await,
                MenuChoice::RequestWebView => self.request_webview_for_all().await,
                MenuChoice::LogoutAndExit => {
                    info!("Logging out and exiting...");
                    self.logout_all().await;
                    return Ok(());
                }
            };

            match result {
                Ok(()) => {}
                Err(WorkflowError::Prompt(PromptError::Closed)) => {
                    self.close_on_eof();
                    return Ok(());
                }
                Err(e) => error!("Operation failed: {}", e),
            }
        }
    }

    /// Signs in a new account by phone number and saves its session.
    pub async fn login_with_phone(&mut self) -> Result<(), WorkflowError> {
        let phone = self
            .prompter
            .ask("Please enter your phone number (e.g., +1234567890)")?;

        let mut prompts = PromptedLogin::new(phone.as_str(), &mut self.prompter);
        let LoggedIn { client, credential } =
            match self.connector.login_with_phone(&mut prompts).await {
                Ok(logged_in) => logged_in,
                Err(TelegramError::Input(e)) => return Err(e.into()),
                Err(e) => {
                    error!("Login failed: {}", e);
                    return Ok(());
                }
            };

        info!("Logged in successfully");

        if let Err(e) = self.sessions.save(&phone, &credential) {
            client.disconnect();
            return Err(e.into());
        }

        self.register(&phone, client);
        Ok(())
    }

    /// Resumes one or all accounts from stored session files.
    pub async fn login_with_session_file(&mut self) -> Result<(), WorkflowError> {
        let files = self.sessions.list()?;
        if files.is_empty() {
            info!("No session files found in {}", self.sessions.dir().display());
            return Ok(());
        }

        println!("Select a session file to login with:");
        for (i, file) in files.iter().enumerate() {
            println!("{}. {}", i + 1, file);
        }

        let answer = self
            .prompter
            .ask("Enter the session file number (or 0 for all)")?;

        let selected = match SessionSelection::parse(&answer, files.len()) {
            Some(SessionSelection::All) => files,
            Some(SessionSelection::One(index)) => files.into_iter().skip(index).take(1).collect(),
            None => {
                warn!("Invalid session file selection: {:?}", answer);
                return Ok(());
            }
        };

        for file in &selected {
            self.login_from_file(file).await;
        }
        Ok(())
    }

    async fn login_from_file(&mut self, file: &str) {
        let credential = match self.sessions.load(file) {
            Ok(credential) => credential,
            Err(e) => {
                error!("Failed to login using session file {}: {}", file, e);
                return;
            }
        };

        if is_blank_credential(&credential) {
            warn!("Session file {} is empty or invalid.", file);
            return;
        }

        if !self.login_delay.is_zero() {
            debug!("Waiting {:?} before connecting", self.login_delay);
            tokio::time::sleep(self.login_delay).await;
        }

        let name = SessionStore::account_name(file);
        match self.connector.resume(name, &credential).await {
            Ok(client) => {
                info!("Logged in using session file: {}", file);
                self.register(name, client);
            }
            Err(e) => error!("Failed to login using session file {}: {}", file, e),
        }
    }

    fn register(&mut self, name: &str, client: C::Client) {
        if let Some(replaced) = self.registry.insert(name, client) {
            warn!("Account {} was already logged in; replacing its client", name);
            replaced.disconnect();
        }
    }

    /// Requests a WebView from one bot for every logged-in account.
    pub async fn request_webview_for_all(&mut self) -> Result<(), WorkflowError> {
        if self.registry.is_empty() {
            info!("No accounts are logged in.");
            return Ok(());
        }

        let bot = self
            .prompter
            .ask("Please enter the bot peer (e.g., @YourBot)")?;
        let url = self.prompter.ask("Please enter the WebView URL")?;

        info!(
            "Requesting WebView from {} for {} account(s): {}",
            bot,
            self.registry.len(),
            self.registry.names().join(", ")
        );

        for (name, client) in self.registry.iter() {
            info!("Processing account: {}", name);
            match Self::collect_webview(client, &mut self.results, name, &bot, &url).await {
                Ok(path) => debug!("{} written for {}", path.display(), name),
                Err(e) => error!("Error requesting WebView for {}: {}", name, e),
            }
        }
        Ok(())
    }

    async fn collect_webview(
        client: &C::Client,
        results: &mut ResultStore,
        name: &str,
        bot: &str,
        url: &str,
    ) -> Result<PathBuf, AccountStepError> {
        let webview_url = client.request_webview(bot, url).await?;
        let payload = extract_webapp_data(&webview_url)?;
        Ok(results.record(bot, name, payload)?)
    }

    /// Logs out every account; failures are reported and skipped.
    pub async fn logout_all(&mut self) {
        let accounts: Vec<_> = self.registry.drain().collect();
        for (name, client) in accounts {
            match client.log_out().await {
                Ok(()) => info!("Logged out {} successfully.", name),
                Err(e) => error!("Error logging out {}: {}", name, e),
            }
            client.disconnect();
        }
    }

    fn close_on_eof(&mut self) {
        info!("Input closed; disconnecting without logging out");
        for (_, client) in self.registry.drain() {
            client.disconnect();
        }
    }
}
