//! User interaction for the generoo CLI.
use dialoguer::Confirm;

use crate::error::{Error, Result};

/// Asks the user yes/no questions.
pub trait Prompter {
    fn confirm(&self, prompt: String, default: bool) -> Result<bool>;
}

/// Terminal prompter backed by dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, prompt: String, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| Error::IoError(std::io::Error::other(e)))
    }
}
