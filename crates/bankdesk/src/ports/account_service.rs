//! Account Service Port
//!
//! Abstract interface to the banking backend that owns accounts and balances.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::TransactionRecord;
use crate::domain::errors::ServiceError;
use crate::domain::value_objects::TransactionType;

/// 2xx payload of `POST /transactions`.
///
/// A business failure (e.g. insufficient funds) may arrive here as `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransactionOutcome {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            message: None,
            error: Some(error.into()),
        }
    }

    /// Text to show: the message, falling back to the error
    pub fn status_text(&self) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or(self.error.as_deref())
            .unwrap_or_default()
            .to_string()
    }

    pub fn is_error(&self) -> bool {
        self.message.as_deref().map_or(true, str::is_empty) && self.error.is_some()
    }
}

/// Service interface for the account backend
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Whether the account has any ledger rows
    async fn account_exists(&self, account_number: &str) -> Result<bool, ServiceError>;

    /// Open an account with an initial balance
    async fn create_account(
        &self,
        account_number: &str,
        initial_balance: f64,
    ) -> Result<(), ServiceError>;

    /// Post a deposit or withdrawal
    async fn post_transaction(
        &self,
        account_number: &str,
        transaction_type: TransactionType,
        amount: f64,
    ) -> Result<TransactionOutcome, ServiceError>;

    /// Current balance of an account
    async fn get_balance(&self, account_number: &str) -> Result<f64, ServiceError>;

    /// Every ledger row the backend holds
    async fn list_transactions(&self) -> Result<Vec<TransactionRecord>, ServiceError>;

    /// Welcome text served at the root; used as a connectivity check
    async fn ping(&self) -> Result<String, ServiceError>;
}
