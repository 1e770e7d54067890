//! Flat-file persistence for session credentials and WebView results.
//!
//! Both stores create their directory lazily on first write and derive
//! filenames from sanitized identifiers.

mod results;
mod sessions;

use std::path::{Path, PathBuf};

pub use results::ResultStore;
pub use sessions::{SESSION_SUFFIX, SessionStore, is_blank_credential};

/// Filesystem errors annotated with the path involved.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Strips every non-digit character from a phone number.
#[must_use]
pub fn sanitize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Strips a leading `@` from a bot identifier.
#[must_use]
pub fn sanitize_bot(bot: &str) -> &str {
    bot.strip_prefix('@').unwrap_or(bot)
}

fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    std::fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_phone_keeps_digits_in_order() {
        assert_eq!(sanitize_phone("+1 (234) 567-890"), "1234567890");
        assert_eq!(sanitize_phone("+7 999 123 45 67"), "79991234567");
        assert_eq!(sanitize_phone("no digits"), "");
    }

    #[test]
    fn test_sanitize_phone_only_digits() {
        for input in ["+44 20 7946 0958", "001-555-0100", "+380(67)1234567"] {
            let sanitized = sanitize_phone(input);
            assert!(sanitized.chars().all(|c| c.is_ascii_digit()));
            let expected: String = input.chars().filter(char::is_ascii_digit).collect();
            assert_eq!(sanitized, expected);
        }
    }

    #[test]
    fn test_sanitize_bot() {
        assert_eq!(sanitize_bot("@SomeBot"), "SomeBot");
        assert_eq!(sanitize_bot("SomeBot"), "SomeBot");
        assert_eq!(sanitize_bot("@@odd"), "@odd");
    }
}
