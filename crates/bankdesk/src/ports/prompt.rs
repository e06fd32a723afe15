//! Creation Prompt Port
//!
//! Asks the user whether a missing account should be opened.

/// Yes/no confirmation shown when the account does not exist.
///
/// Called from inside the async submit and may block the current thread
/// while waiting for the user.
pub trait CreationPrompt: Send + Sync {
    fn confirm_create(&self, account_number: &str) -> bool;
}

/// Fixed answer, for non-interactive runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoAnswer(pub bool);

impl CreationPrompt for AutoAnswer {
    fn confirm_create(&self, _account_number: &str) -> bool {
        self.0
    }
}
