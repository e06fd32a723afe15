//! Action - what the user asked the teller to do

use serde::{Deserialize, Serialize};

/// Action selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Deposit,
    Withdraw,
    ViewBalance,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Deposit, Action::Withdraw, Action::ViewBalance];

    /// Wire transaction type, for actions that move money
    pub fn transaction_type(self) -> Option<TransactionType> {
        match self {
            Action::Deposit => Some(TransactionType::Deposit),
            Action::Withdraw => Some(TransactionType::Withdraw),
            Action::ViewBalance => None,
        }
    }

    /// Whether the action needs an amount
    pub fn needs_amount(self) -> bool {
        self.transaction_type().is_some()
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Deposit => write!(f, "Deposit"),
            Action::Withdraw => write!(f, "Withdraw"),
            Action::ViewBalance => write!(f, "View Balance"),
        }
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(|c: char| c == '_' || c == '-', " ").as_str() {
            "deposit" => Ok(Action::Deposit),
            "withdraw" => Ok(Action::Withdraw),
            "view balance" | "balance" => Ok(Action::ViewBalance),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

/// `transaction_type` field of `POST /transactions`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionType {
    Deposit,
    Withdraw,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Deposit => write!(f, "Deposit"),
            TransactionType::Withdraw => write!(f, "Withdraw"),
        }
    }
}
