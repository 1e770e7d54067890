//! Creates [`TelegramAccount`]s from phone numbers or stored credentials.
//!
//! Every connection gets its own SQLite database in a private directory
//! that lives as long as the connector. Paths are never reused, so opening
//! one account cannot touch the files of another client that is still
//! running.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tempfile::TempDir;
use tracing::{debug, info};

use super::client::{TelegramAccount, TelegramError, mask_phone};
use crate::accounts::{AccountConnector, LoggedIn};
use crate::config::TelegramConfig;
use crate::prompt::LoginPrompts;
use crate::storage::sanitize_phone;

/// grammers-backed [`AccountConnector`].
#[derive(Debug)]
pub struct GrammersConnector {
    config: TelegramConfig,
    live_dir: TempDir,
    next_id: AtomicU64,
    platform: String,
}

impl GrammersConnector {
    /// Creates a connector with a fresh private directory for live sessions.
    pub fn new(config: TelegramConfig, platform: impl Into<String>) -> Result<Self, TelegramError> {
        let live_dir = tempfile::Builder::new()
            .prefix("query_id_bot-")
            .tempdir()
            .map_err(|e| TelegramError::Session(e.to_string()))?;
        debug!("Live sessions in {}", live_dir.path().display());

        Ok(Self {
            config,
            live_dir,
            next_id: AtomicU64::new(1),
            platform: platform.into(),
        })
    }

    /// Returns a database path no other connection has used.
    fn live_path(&self, label: &str) -> PathBuf {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let label: String = label.chars().filter(char::is_ascii_alphanumeric).collect();
        self.live_dir.path().join(format!("{id:04}-{label}.sqlite"))
    }

    /// Decodes `credential` into a new live database for `name`.
    fn restore_credential(&self, name: &str, credential: &str) -> Result<PathBuf, TelegramError> {
        let bytes = STANDARD
            .decode(credential.trim())
            .map_err(|e| TelegramError::InvalidCredential(e.to_string()))?;
        if bytes.is_empty() {
            return Err(TelegramError::InvalidCredential("empty session".to_owned()));
        }

        let path = self.live_path(&format!("session{name}"));
        std::fs::write(&path, bytes).map_err(|e| TelegramError::Session(e.to_string()))?;
        Ok(path)
    }
}

/// Encodes a closed session database as a credential string.
///
/// Refuses a database that still has writes pending in its write-ahead log,
/// since those would be missing from the credential.
fn snapshot_credential(path: &Path) -> Result<String, TelegramError> {
    let mut wal = path.as_os_str().to_owned();
    wal.push("-wal");
    if std::fs::metadata(&wal).is_ok_and(|meta| meta.len() > 0) {
        return Err(TelegramError::Session(format!(
            "{} still has uncheckpointed writes",
            path.display()
        )));
    }

    let bytes = std::fs::read(path).map_err(|e| TelegramError::Session(e.to_string()))?;
    if bytes.is_empty() {
        return Err(TelegramError::Session(format!(
            "{} is empty",
            path.display()
        )));
    }
    Ok(STANDARD.encode(bytes))
}

impl AccountConnector for GrammersConnector {
    type Client = TelegramAccount;

    async fn login_with_phone<P: LoginPrompts>(
        &self,
        prompts: &mut P,
    ) -> Result<LoggedIn<TelegramAccount>, TelegramError> {
        let phone = prompts.phone()?;
        let path = self.live_path(&format!("phone{}", sanitize_phone(&phone)));

        let account = TelegramAccount::connect(self.config.api_id, &path, &self.platform).await?;
        if let Err(e) = account
            .sign_in(&phone, &self.config.api_hash, prompts)
            .await
        {
            account.close().await;
            return Err(e);
        }

        // The credential is read only once the database is closed; the
        // account then reconnects from the same file.
        let path = account.close().await;
        let credential = snapshot_credential(&path)?;
        let client = TelegramAccount::connect(self.config.api_id, &path, &self.platform).await?;

        info!("Logged in {}", mask_phone(&phone));
        Ok(LoggedIn { client, credential })
    }

    async fn resume(&self, name: &str, credential: &str) -> Result<TelegramAccount, TelegramError> {
        let path = self.restore_credential(name, credential)?;

        let account = TelegramAccount::connect(self.config.api_id, &path, &self.platform).await?;
        match account.is_authorized().await {
            Ok(true) => Ok(account),
            Ok(false) => {
                account.close().await;
                Err(TelegramError::NotAuthorized)
            }
            Err(e) => {
                account.close().await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector() -> GrammersConnector {
        GrammersConnector::new(TelegramConfig::new(1, "hash".to_owned()), "android").unwrap()
    }

    #[test]
    fn test_live_paths_never_collide() {
        let connector = connector();

        let alice = connector.live_path("sessionalice");
        let bob = connector.live_path("sessionbob");
        let again = connector.live_path("sessionalice");

        assert_ne!(alice, bob);
        assert_ne!(alice, again);
        assert!(alice.starts_with(connector.live_dir.path()));
    }

    #[test]
    fn test_live_paths_for_file_and_phone_of_same_number_differ() {
        let connector = connector();

        let from_phone = connector.live_path(&format!("phone{}", sanitize_phone("+15550100")));
        let from_file = connector.live_path("session15550100");

        assert_ne!(from_phone, from_file);
    }

    #[test]
    fn test_restoring_same_name_keeps_earlier_database() {
        let connector = connector();
        let credential = STANDARD.encode(b"SQLite format 3\0first");

        let first = connector.restore_credential("15550100", &credential).unwrap();
        let second = connector.restore_credential("15550100", &credential).unwrap();

        assert_ne!(first, second);
        assert!(first.exists());
        assert!(second.exists());
    }

    #[test]
    fn test_restore_is_byte_identical() {
        let connector = connector();
        let bytes = b"SQLite format 3\0\x01\x02\x03".to_vec();

        let path = connector
            .restore_credential("alice", &format!("{}\n", STANDARD.encode(&bytes)))
            .unwrap();

        assert_eq!(std::fs::read(path).unwrap(), bytes);
    }

    #[test]
    fn test_snapshot_refuses_pending_wal() {
        let connector = connector();
        let path = connector.live_path("phone1");
        let mut wal = path.clone().into_os_string();
        wal.push("-wal");
        std::fs::write(&path, b"main").unwrap();
        std::fs::write(&wal, b"pending").unwrap();

        assert!(matches!(
            snapshot_credential(&path),
            Err(TelegramError::Session(_))
        ));
    }

    #[test]
    fn test_snapshot_encodes_database() {
        let connector = connector();
        let path = connector.live_path("phone1");
        std::fs::write(&path, b"SQLite format 3\0data").unwrap();

        let credential = snapshot_credential(&path).unwrap();

        assert_eq!(STANDARD.decode(credential).unwrap(), b"SQLite format 3\0data");
    }

    #[tokio::test]
    async fn test_resume_rejects_non_base64() {
        let connector = connector();

        let result = connector.resume("42", "not base64 !!").await;

        assert!(matches!(result, Err(TelegramError::InvalidCredential(_))));
    }

    #[tokio::test]
    async fn test_session_database_survives_close_snapshot_and_restore() {
        let connector = connector();
        let path = connector.live_path("phone15550100");

        let account = TelegramAccount::connect(1, &path, "android").await.unwrap();
        let path = account.close().await;
        let credential = snapshot_credential(&path).unwrap();

        let bytes = STANDARD.decode(&credential).unwrap();
        assert!(bytes.starts_with(b"SQLite format 3\0"));

        let restored = connector.restore_credential("15550100", &credential).unwrap();
        assert_ne!(restored, path);
        assert_eq!(std::fs::read(&restored).unwrap(), std::fs::read(&path).unwrap());

        let reopened = TelegramAccount::connect(1, &restored, "android").await.unwrap();
        let restored = reopened.close().await;
        let reread = STANDARD.decode(snapshot_credential(&restored).unwrap()).unwrap();
        assert!(reread.starts_with(b"SQLite format 3\0"));
    }
}
