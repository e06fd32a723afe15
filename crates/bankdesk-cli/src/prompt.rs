//! Terminal confirmation for opening a missing account

use bankdesk::{messages, AutoAnswer, CreationPrompt};
use dialoguer::Confirm;

/// Asks on the terminal; a failed read counts as "no"
pub struct TerminalPrompt;

impl CreationPrompt for TerminalPrompt {
    fn confirm_create(&self, account_number: &str) -> bool {
        Confirm::new()
            .with_prompt(format!("{} ({})", messages::CREATE_PROMPT, account_number))
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Prompt chosen from flags and config
pub enum CliPrompt {
    Terminal(TerminalPrompt),
    Fixed(AutoAnswer),
}

impl CliPrompt {
    /// `--yes` / `--no-create` beat the config default; otherwise ask
    pub fn from_flags(yes: bool, no_create: bool, config_default: Option<bool>) -> Self {
        match (yes, no_create, config_default) {
            (true, _, _) => Self::Fixed(AutoAnswer(true)),
            (_, true, _) => Self::Fixed(AutoAnswer(false)),
            (_, _, Some(answer)) => Self::Fixed(AutoAnswer(answer)),
            _ => Self::Terminal(TerminalPrompt),
        }
    }
}

impl CreationPrompt for CliPrompt {
    fn confirm_create(&self, account_number: &str) -> bool {
        match self {
            Self::Terminal(p) => p.confirm_create(account_number),
            Self::Fixed(p) => p.confirm_create(account_number),
        }
    }
}
