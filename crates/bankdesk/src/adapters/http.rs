//! HTTP Account Service
//!
//! Talks to the banking backend's JSON API using reqwest.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::{ServiceError, TransactionRecord, TransactionType};
use crate::ports::{AccountService, TransactionOutcome};

/// reqwest implementation of AccountService
#[derive(Clone)]
pub struct HttpAccountService {
    client: Client,
    base_url: String,
}

// ============================================
// Wire Types
// ============================================

#[derive(Debug, Deserialize)]
struct AccountExistsResponse {
    account_exists: bool,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: f64,
}

#[derive(Debug, Deserialize)]
struct TransactionsResponse {
    #[serde(default)]
    transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateAccountRequest<'a> {
    account_number: &'a str,
    initial_balance: f64,
}

#[derive(Debug, Serialize)]
struct TransactionRequest<'a> {
    account_number: &'a str,
    transaction_type: TransactionType,
    amount: f64,
}

impl HttpAccountService {
    /// Create a client with reqwest's default settings
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client with a per-request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bankdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServiceError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn account_url(&self, path: &str, account_number: &str) -> String {
        format!(
            "{}/{}?account_number={}",
            self.base_url,
            path,
            urlencoding::encode(account_number)
        )
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ServiceError> {
        let resp = request
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let error = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.error);
            debug!(status, error = ?error, "Backend returned an error status");
            return Err(ServiceError::Api { status, error });
        }

        Ok(resp)
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ServiceError> {
        resp.json()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AccountService for HttpAccountService {
    async fn account_exists(&self, account_number: &str) -> Result<bool, ServiceError> {
        let url = self.account_url("check_account", account_number);
        debug!(account = %account_number, "Checking account");

        let resp = self.send(self.client.get(&url)).await?;
        let body: AccountExistsResponse = Self::decode(resp).await?;

        Ok(body.account_exists)
    }

    async fn create_account(
        &self,
        account_number: &str,
        initial_balance: f64,
    ) -> Result<(), ServiceError> {
        let url = format!("{}/create_account", self.base_url);
        debug!(account = %account_number, initial_balance, "Creating account");

        let request = CreateAccountRequest {
            account_number,
            initial_balance,
        };
        self.send(self.client.post(&url).json(&request)).await?;

        Ok(())
    }

    async fn post_transaction(
        &self,
        account_number: &str,
        transaction_type: TransactionType,
        amount: f64,
    ) -> Result<TransactionOutcome, ServiceError> {
        let url = format!("{}/transactions", self.base_url);
        debug!(account = %account_number, %transaction_type, amount, "Posting transaction");

        let request = TransactionRequest {
            account_number,
            transaction_type,
            amount,
        };
        let resp = self.send(self.client.post(&url).json(&request)).await?;

        Self::decode(resp).await
    }

    async fn get_balance(&self, account_number: &str) -> Result<f64, ServiceError> {
        let url = self.account_url("balance", account_number);
        debug!(account = %account_number, "Fetching balance");

        let resp = self.send(self.client.get(&url)).await?;
        let body: BalanceResponse = Self::decode(resp).await?;

        Ok(body.balance)
    }

    async fn list_transactions(&self) -> Result<Vec<TransactionRecord>, ServiceError> {
        let url = format!("{}/transactions", self.base_url);
        debug!("Listing transactions");

        let resp = self.send(self.client.get(&url)).await?;
        let body: TransactionsResponse = Self::decode(resp).await?;

        Ok(body.transactions)
    }

    async fn ping(&self) -> Result<String, ServiceError> {
        let url = format!("{}/", self.base_url);

        let resp = self.send(self.client.get(&url)).await?;
        resp.text()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}
