//! Session credential files.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{StoreError, ensure_dir, sanitize_phone};

/// Suffix of every credential file in the sessions directory.
pub const SESSION_SUFFIX: &str = ".session";

/// Stores one opaque credential string per account.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Creates a store rooted at `dir`. Nothing is touched on disk yet.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the sessions directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the credential file path for a phone number.
    #[must_use]
    pub fn path_for_phone(&self, phone: &str) -> PathBuf {
        self.dir
            .join(format!("{}{SESSION_SUFFIX}", sanitize_phone(phone)))
    }

    /// Writes a credential, replacing any previous one for the same number.
    pub fn save(&self, phone: &str, credential: &str) -> Result<PathBuf, StoreError> {
        ensure_dir(&self.dir)?;

        let path = self.path_for_phone(phone);
        std::fs::write(&path, credential).map_err(|source| StoreError::Write {
            path: path.clone(),
            source,
        })?;

        info!("Session saved to {}", path.display());
        Ok(path)
    }

    /// Lists credential filenames, sorted.
    ///
    /// An absent directory is reported as an empty list.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.is_dir() {
            debug!("Sessions directory {} does not exist", self.dir.display());
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|source| StoreError::Read {
            path: self.dir.clone(),
            source,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Read {
                path: self.dir.clone(),
                source,
            })?;
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(SESSION_SUFFIX) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    /// Reads the raw credential stored under `name`.
    pub fn load(&self, name: &str) -> Result<String, StoreError> {
        let path = self.dir.join(name);
        std::fs::read_to_string(&path).map_err(|source| StoreError::Read { path, source })
    }

    /// Derives the account name from a credential filename.
    #[must_use]
    pub fn account_name(file_name: &str) -> &str {
        file_name.strip_suffix(SESSION_SUFFIX).unwrap_or(file_name)
    }
}

/// Returns `true` when a stored credential cannot possibly be resumed.
#[must_use]
pub fn is_blank_credential(credential: &str) -> bool {
    credential.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_creates_directory_lazily() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path().join("sessions"));
        assert!(!store.dir().exists());

        let path = store.save("+1 (234) 567-890", "credential").unwrap();

        assert!(store.dir().is_dir());
        assert_eq!(path, store.dir().join("1234567890.session"));
    }

    #[test]
    fn test_save_then_load_is_identical() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path());
        let credential = "U1FMaXRlIGZvcm1hdCAzAA==\n";

        store.save("+15550100", credential).unwrap();
        let names = store.list().unwrap();

        assert_eq!(names, vec!["15550100.session".to_owned()]);
        assert_eq!(store.load(&names[0]).unwrap(), credential);
    }

    #[test]
    fn test_save_overwrites() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path());

        store.save("+15550100", "old").unwrap();
        store.save("1-555-0100", "new").unwrap();

        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(store.load("15550100.session").unwrap(), "new");
    }

    #[test]
    fn test_list_absent_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = SessionStore::new(tmp.path().join("missing"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("222.session"), "b").unwrap();
        std::fs::write(tmp.path().join("111.session"), "a").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        std::fs::create_dir(tmp.path().join("dir.session")).unwrap();

        let store = SessionStore::new(tmp.path());
        assert_eq!(
            store.list().unwrap(),
            vec!["111.session".to_owned(), "222.session".to_owned()]
        );
    }

    #[test]
    fn test_account_name() {
        assert_eq!(SessionStore::account_name("15550100.session"), "15550100");
        assert_eq!(SessionStore::account_name("plain"), "plain");
    }

    #[test]
    fn test_blank_credential() {
        assert!(is_blank_credential(""));
        assert!(is_blank_credential(" \n\t "));
        assert!(!is_blank_credential(" abc "));
    }
}
