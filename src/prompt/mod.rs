//! Interactive question/answer over the terminal.
//!
//! All operator input goes through a [`Prompter`]. Login code and password
//! requests are funnelled through the narrower [`LoginPrompts`] capability
//! so the sign-in sequence can be driven by scripted answers in tests.

mod terminal;

use tracing::error;

pub use terminal::TerminalPrompter;

use crate::telegram::TelegramError;

/// Errors raised while waiting for operator input.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Input stream closed")]
    Closed,

    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Line-based prompt source. One outstanding question at a time.
pub trait Prompter {
    /// Shows `prompt` and blocks until one line of input is available.
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError>;

    /// Like [`Prompter::ask`], without echoing the answer.
    fn ask_secret(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.ask(prompt)
    }
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        (**self).ask(prompt)
    }

    fn ask_secret(&mut self, prompt: &str) -> Result<String, PromptError> {
        (**self).ask_secret(prompt)
    }
}

/// Values requested by the interactive sign-in sequence.
pub trait LoginPrompts {
    /// Phone number to send the login code to.
    fn phone(&mut self) -> Result<String, PromptError>;

    /// Login code received in the Telegram app or by SMS.
    fn code(&mut self) -> Result<String, PromptError>;

    /// Two-factor password; only asked when the account has one.
    fn password(&mut self, hint: Option<&str>) -> Result<String, PromptError>;

    /// Called once with the error that ended the sequence.
    fn on_error(&mut self, error: &TelegramError);
}

/// [`LoginPrompts`] backed by a [`Prompter`], with the phone number known
/// up front.
pub struct PromptedLogin<'a, P: ?Sized> {
    phone: String,
    prompter: &'a mut P,
}

impl<'a, P: Prompter + ?Sized> PromptedLogin<'a, P> {
    /// Wraps `prompter` for a sign-in of `phone`.
    pub fn new(phone: impl Into<String>, prompter: &'a mut P) -> Self {
        Self {
            phone: phone.into(),
            prompter,
        }
    }
}

impl<P: Prompter + ?Sized> LoginPrompts for PromptedLogin<'_, P> {
    fn phone(&mut self) -> Result<String, PromptError> {
        Ok(self.phone.clone())
    }

    fn code(&mut self) -> Result<String, PromptError> {
        self.prompter.ask("Please enter the code you received")
    }

    fn password(&mut self, hint: Option<&str>) -> Result<String, PromptError> {
        let prompt = format!(
            "Please enter your 2FA password (hint: {})",
            hint.unwrap_or("no hint")
        );
        self.prompter.ask_secret(&prompt)
    }

    fn on_error(&mut self, error: &TelegramError) {
        error!("Error: {}", error);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::{PromptError, Prompter};

    /// Answers prompts from a fixed script; closes once it runs dry.
    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<String>,
        pub asked: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new<I, S>(answers: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                answers: answers.into_iter().map(Into::into).collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
            self.asked.push(prompt.to_owned());
            self.answers.pop_front().ok_or(PromptError::Closed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ScriptedPrompter;
    use super::*;

    #[test]
    fn test_prompted_login_phone_is_not_asked() {
        let mut prompter = ScriptedPrompter::new(["12345"]);
        let mut login = PromptedLogin::new("+1 555 0100", &mut prompter);

        assert_eq!(login.phone().unwrap(), "+1 555 0100");
        assert_eq!(login.code().unwrap(), "12345");
        assert_eq!(prompter.asked.len(), 1);
    }

    #[test]
    fn test_prompted_login_password_shows_hint() {
        let mut prompter = ScriptedPrompter::new(["secret"]);
        let mut login = PromptedLogin::new("+1", &mut prompter);

        assert_eq!(login.password(Some("pet name")).unwrap(), "secret");
        assert!(prompter.asked[0].contains("pet name"));
    }

    #[test]
    fn test_scripted_prompter_closes_when_empty() {
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        assert!(matches!(prompter.ask("anything"), Err(PromptError::Closed)));
    }
}
