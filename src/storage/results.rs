//! Per-bot WebView result files.
//!
//! Payloads are accumulated in memory per bot, keyed by account, and the
//! whole file is rewritten after every new payload. The file only reflects
//! what this process collected; entries from earlier runs are replaced.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::info;

use super::{StoreError, ensure_dir, sanitize_bot};

/// Payloads for one bot, in first-insertion order of their accounts.
#[derive(Debug, Default)]
struct BotRecord {
    entries: Vec<(String, String)>,
}

impl BotRecord {
    fn insert(&mut self, account: &str, payload: String) {
        match self.entries.iter_mut().find(|(name, _)| name == account) {
            Some((_, existing)) => *existing = payload,
            None => self.entries.push((account.to_owned(), payload)),
        }
    }

    fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(_, payload)| payload.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Writes decoded WebView payloads, one file per bot.
#[derive(Debug)]
pub struct ResultStore {
    dir: PathBuf,
    records: HashMap<String, BotRecord>,
}

impl ResultStore {
    /// Creates a store rooted at `dir` with nothing accumulated.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            records: HashMap::new(),
        }
    }

    /// Returns the result file path for a bot identifier.
    #[must_use]
    pub fn path_for_bot(&self, bot: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", sanitize_bot(bot)))
    }

    /// Records `payload` for `account` and rewrites the bot's file.
    pub fn record(
        &mut self,
        bot: &str,
        account: &str,
        payload: String,
    ) -> Result<PathBuf, StoreError> {
        let record = self
            .records
            .entry(sanitize_bot(bot).to_owned())
            .or_default();
        record.insert(account, payload);
        let output = record.render();

        ensure_dir(&self.dir)?;
        let path = self.path_for_bot(bot);
        std::fs::write(&path, output).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;

        info!("WebView result saved to {}", path.display());
        Ok(path)
    }
}
