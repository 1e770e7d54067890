//! Menu choices and session-file selection parsing.

use std::fmt;

/// Top-level menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Sign in a new account with its phone number.
    LoginWithPhone,

    /// Resume accounts from stored session files.
    LoginWithSessionFile,

    /// Request a WebView for every logged-in account.
    RequestWebView,

    /// Log every account out and leave.
    LogoutAndExit,
}

impl MenuChoice {
    /// All entries in menu order.
    pub const ALL: [Self; 4] = [
        Self::LoginWithPhone,
        Self::LoginWithSessionFile,
        Self::RequestWebView,
        Self::LogoutAndExit,
    ];

    /// Parses the operator's answer (`1` to `4`).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::LoginWithPhone),
            "2" => Some(Self::LoginWithSessionFile),
            "3" => Some(Self::RequestWebView),
            "4" => Some(Self::LogoutAndExit),
            _ => None,
        }
    }

    /// Number shown next to the entry.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::LoginWithPhone => 1,
            Self::LoginWithSessionFile => 2,
            Self::RequestWebView => 3,
            Self::LogoutAndExit => 4,
        }
    }
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::LoginWithPhone => "Login with phone number",
            Self::LoginWithSessionFile => "Login with session file",
            Self::RequestWebView => "Request WebView for all accounts",
            Self::LogoutAndExit => "Logout and exit",
        };
        write!(f, "{}. {label}", self.number())
    }
}

/// Which session files to log in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSelection {
    /// Every listed file.
    All,

    /// One file, by zero-based position in the list.
    One(usize),
}

impl SessionSelection {
    /// Parses a 1-based file number, `0` meaning all of `count` files.
    #[must_use]
    pub fn parse(input: &str, count: usize) -> Option<Self> {
        match input.trim().parse::<usize>().ok()? {
            0 => Some(Self::All),
            n if n <= count => Some(Self::One(n - 1)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_parse() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::LoginWithPhone));
        assert_eq!(MenuChoice::parse(" 4 "), Some(MenuChoice::LogoutAndExit));
        assert_eq!(MenuChoice::parse("5"), None);
        assert_eq!(MenuChoice::parse("exit"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }

    #[test]
    fn test_menu_display() {
        assert_eq!(
            MenuChoice::RequestWebView.to_string(),
            "3. Request WebView for all accounts"
        );
        for (i, choice) in MenuChoice::ALL.iter().enumerate() {
            assert_eq!(usize::from(choice.number()), i + 1);
        }
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!(SessionSelection::parse("0", 3), Some(SessionSelection::All));
        assert_eq!(SessionSelection::parse("1", 3), Some(SessionSelection::One(0)));
        assert_eq!(SessionSelection::parse("3", 3), Some(SessionSelection::One(2)));
        assert_eq!(SessionSelection::parse("4", 3), None);
        assert_eq!(SessionSelection::parse("-1", 3), None);
        assert_eq!(SessionSelection::parse("two", 3), None);
    }
}
