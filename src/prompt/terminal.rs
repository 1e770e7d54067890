//! Terminal prompter built on `dialoguer`.

use std::io::ErrorKind;

use dialoguer::{Input, Password};

use super::{PromptError, Prompter};

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String, PromptError> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(map_dialoguer_error)?;

        Ok(answer.trim().to_owned())
    }

    fn ask_secret(&mut self, prompt: &str) -> Result<String, PromptError> {
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(map_dialoguer_error)
    }
}

fn map_dialoguer_error(err: dialoguer::Error) -> PromptError {
    match err {
        dialoguer::Error::IO(e)
            if matches!(e.kind(), ErrorKind::UnexpectedEof | ErrorKind::NotConnected) =>
        {
            PromptError::Closed
        }
        dialoguer::Error::IO(e) => PromptError::Terminal(e.to_string()),
    }
}
