//! Teller Application Service (Use Case)
//!
//! Owns the session state and sequences the backend calls for one submit:
//! check the account, then either open it or perform the selected action.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::messages;
use crate::domain::{
    Action, Phase, ServiceError, SessionInput, StatusMessage, TellerError, TransactionRecord,
};
use crate::ports::{AccountService, CreationPrompt};

/// Transaction orchestrator for a single user session
pub struct Teller<S: AccountService, P: CreationPrompt> {
    service: Arc<S>,
    prompt: P,
    input: SessionInput,
    status: StatusMessage,
    phase: watch::Sender<Phase>,
}

/// Returns the teller to idle when a submit ends, including a dropped one
struct IdleOnDrop<'a>(&'a watch::Sender<Phase>);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.send_replace(Phase::Idle);
    }
}

impl<S: AccountService, P: CreationPrompt> Teller<S, P> {
    pub fn new(service: Arc<S>, prompt: P) -> Self {
        let (phase, _) = watch::channel(Phase::Idle);
        Self {
            service,
            prompt,
            input: SessionInput::default(),
            status: StatusMessage::default(),
            phase,
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Follow phase changes, e.g. to show "Processing..." while a submit runs
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.phase().is_busy()
    }

    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    pub fn input(&self) -> &SessionInput {
        &self.input
    }

    /// Choose an action; clears the amount and the previous status
    pub fn select_action(&mut self, action: Action) -> Result<(), TellerError> {
        if self.is_busy() {
            return Err(TellerError::Busy);
        }

        self.input.action = Some(action);
        self.input.amount = None;
        self.status = StatusMessage::default();
        self.phase.send_replace(Phase::ActionSelected(action));
        Ok(())
    }

    pub fn set_account_number(&mut self, account_number: impl Into<String>) {
        self.input.account_number = account_number.into();
    }

    pub fn set_amount(&mut self, amount: Option<f64>) {
        self.input.amount = amount;
    }

    /// Run the submit sequence for the current input.
    ///
    /// The input is consumed up front and the phase goes back to idle when
    /// the sequence ends, even if this future is dropped before completing.
    pub async fn submit(&mut self) -> Result<StatusMessage, TellerError> {
        if self.is_busy() {
            return Err(TellerError::Busy);
        }
        let action = self.input.action.ok_or(TellerError::NoAction)?;

        let input = std::mem::take(&mut self.input);
        self.status = StatusMessage::default();
        self.phase.send_replace(Phase::Submitting(action));
        let _idle = IdleOnDrop(&self.phase);
        debug!(account = %input.account_number, action = %action, "Submitting");

        let status = self.run_sequence(&input, action).await;

        self.status = status.clone();
        Ok(status)
    }

    /// Ledger rows, newest first, optionally for one account only
    pub async fn history(
        &self,
        account_number: Option<&str>,
    ) -> Result<Vec<TransactionRecord>, ServiceError> {
        let mut records = self.service.list_transactions().await?;
        if let Some(account) = account_number {
            records.retain(|r| r.account_number == account);
        }
        records.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(records)
    }

    /// Connectivity check against the backend root
    pub async fn ping(&self) -> Result<String, ServiceError> {
        self.service.ping().await
    }

    async fn run_sequence(&self, input: &SessionInput, action: Action) -> StatusMessage {
        let account = input.account_number.as_str();

        let exists = match self.service.account_exists(account).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!(account = %account, error = %e, "Account check failed");
                return StatusMessage::error(messages::CHECK_FAILED);
            }
        };

        if !exists {
            return self.open_account(input).await;
        }

        let result = match action.transaction_type() {
            Some(transaction_type) => {
                let Some(amount) = input.entered_amount() else {
                    return StatusMessage::error(messages::AMOUNT_REQUIRED);
                };

                self.service
                    .post_transaction(account, transaction_type, amount)
                    .await
                    .map(|outcome| {
                        if outcome.is_error() {
                            StatusMessage::error(outcome.status_text())
                        } else {
                            info!(account = %account, %transaction_type, amount, "Transaction posted");
                            StatusMessage::success(outcome.status_text())
                        }
                    })
            }
            None => self
                .service
                .get_balance(account)
                .await
                .map(|balance| StatusMessage::info(format!("Balance: ${}", balance))),
        };

        result.unwrap_or_else(|e| {
            warn!(account = %account, action = %action, error = %e, "Request failed");
            match e.server_error() {
                Some(server_error) => StatusMessage::error(server_error),
                None => StatusMessage::error(messages::GENERIC_FAILURE),
            }
        })
    }

    /// Account creation stands in for the requested action
    async fn open_account(&self, input: &SessionInput) -> StatusMessage {
        let account = input.account_number.as_str();

        if !self.prompt.confirm_create(account) {
            return StatusMessage::info(messages::CREATE_DECLINED);
        }

        let initial_balance = input.initial_balance();
        match self.service.create_account(account, initial_balance).await {
            Ok(()) => {
                info!(account = %account, initial_balance, "Account created");
                StatusMessage::success(messages::ACCOUNT_CREATED)
            }
            Err(e) => {
                warn!(account = %account, error = %e, "Account creation failed");
                StatusMessage::error(messages::CREATE_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StatusKind, TransactionType};
    use crate::ports::{AutoAnswer, TransactionOutcome};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Check(String),
        Create(String, f64),
        Transact(String, TransactionType, f64),
        Balance(String),
        List,
    }

    /// In-memory backend that records every call
    struct MockService {
        exists: Result<bool, ServiceError>,
        create: Result<(), ServiceError>,
        transact: Result<TransactionOutcome, ServiceError>,
        balance: Result<f64, ServiceError>,
        ledger: Vec<TransactionRecord>,
        /// Holds `get_balance` until notified
        gate: Option<Arc<Notify>>,
        calls: Mutex<Vec<Call>>,
    }

    impl MockService {
        fn existing() -> Self {
            Self {
                exists: Ok(true),
                create: Ok(()),
                transact: Ok(TransactionOutcome::message("Transaction successful")),
                balance: Ok(0.0),
                ledger: Vec::new(),
                gate: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn missing() -> Self {
            Self {
                exists: Ok(false),
                ..Self::existing()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl AccountService for MockService {
        async fn account_exists(&self, account_number: &str) -> Result<bool, ServiceError> {
            self.record(Call::Check(account_number.to_string()));
            self.exists.clone()
        }

        async fn create_account(
            &self,
            account_number: &str,
            initial_balance: f64,
        ) -> Result<(), ServiceError> {
            self.record(Call::Create(account_number.to_string(), initial_balance));
            self.create.clone()
        }

        async fn post_transaction(
            &self,
            account_number: &str,
            transaction_type: TransactionType,
            amount: f64,
        ) -> Result<TransactionOutcome, ServiceError> {
            self.record(Call::Transact(
                account_number.to_string(),
                transaction_type,
                amount,
            ));
            self.transact.clone()
        }

        async fn get_balance(&self, account_number: &str) -> Result<f64, ServiceError> {
            self.record(Call::Balance(account_number.to_string()));
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.balance.clone()
        }

        async fn list_transactions(&self) -> Result<Vec<TransactionRecord>, ServiceError> {
            self.record(Call::List);
            Ok(self.ledger.clone())
        }

        async fn ping(&self) -> Result<String, ServiceError> {
            Ok("Welcome".to_string())
        }
    }

    /// Prompt that counts how often it was asked
    struct CountingPrompt {
        answer: bool,
        asked: AtomicUsize,
    }

    impl CreationPrompt for CountingPrompt {
        fn confirm_create(&self, _account_number: &str) -> bool {
            self.asked.fetch_add(1, Ordering::SeqCst);
            self.answer
        }
    }

    fn teller_with(
        service: MockService,
        answer: bool,
    ) -> (Teller<MockService, AutoAnswer>, Arc<MockService>) {
        let service = Arc::new(service);
        (Teller::new(service.clone(), AutoAnswer(answer)), service)
    }

    async fn submit(
        teller: &mut Teller<MockService, AutoAnswer>,
        account: &str,
        action: Action,
        amount: Option<f64>,
    ) -> StatusMessage {
        teller.select_action(action).unwrap();
        teller.set_account_number(account);
        teller.set_amount(amount);
        teller.submit().await.unwrap()
    }

    fn assert_reset<P: CreationPrompt>(teller: &Teller<MockService, P>) {
        assert!(!teller.is_busy());
        assert_eq!(teller.phase(), Phase::Idle);
        assert_eq!(teller.input(), &SessionInput::default());
    }

    fn transport() -> ServiceError {
        ServiceError::Transport("connection refused".to_string())
    }

    #[tokio::test]
    async fn test_deposit_shows_server_message() {
        let (mut teller, service) = teller_with(
            MockService {
                transact: Ok(TransactionOutcome::message("Deposit successful")),
                ..MockService::existing()
            },
            false,
        );

        let status = submit(&mut teller, "123", Action::Deposit, Some(50.0)).await;

        assert_eq!(status.text(), "Deposit successful");
        assert_eq!(status.kind, StatusKind::Success);
        assert_eq!(teller.status(), &status);
        assert_eq!(
            service.calls(),
            vec![
                Call::Check("123".into()),
                Call::Transact("123".into(), TransactionType::Deposit, 50.0),
            ]
        );
        assert_reset(&teller);
    }

    #[tokio::test]
    async fn test_view_balance() {
        let (mut teller, service) = teller_with(
            MockService {
                balance: Ok(250.0),
                ..MockService::existing()
            },
            false,
        );

        let status = submit(&mut teller, "999", Action::ViewBalance, None).await;

        assert_eq!(status.text(), "Balance: $250");
        assert_eq!(
            service.calls(),
            vec![Call::Check("999".into()), Call::Balance("999".into())]
        );
        assert_reset(&teller);
    }

    #[tokio::test]
    async fn test_fractional_balance() {
        let (mut teller, _) = teller_with(
            MockService {
                balance: Ok(12.75),
                ..MockService::existing()
            },
            false,
        );

        let status = submit(&mut teller, "1", Action::ViewBalance, None).await;
        assert_eq!(status.text(), "Balance: $12.75");
    }

    #[tokio::test]
    async fn test_withdraw_error_body_shown_verbatim() {
        let (mut teller, _) = teller_with(
            MockService {
                transact: Err(ServiceError::Api {
                    status: 400,
                    error: Some("Insufficient funds".to_string()),
                }),
                ..MockService::existing()
            },
            false,
        );

        let status = submit(&mut teller, "555", Action::Withdraw, Some(1000.0)).await;

        assert_eq!(status.text(), "Insufficient funds");
        assert_eq!(status.kind, StatusKind::Error);
        assert_reset(&teller);
    }

    #[tokio::test]
    async fn test_business_error_in_success_payload() {
        let (mut teller, _) = teller_with(
            MockService {
                transact: Ok(TransactionOutcome::error("Insufficient funds")),
                ..MockService::existing()
            },
            false,
        );

        let status = submit(&mut teller, "555", Action::Withdraw, Some(1000.0)).await;

        assert_eq!(status.text(), "Insufficient funds");
        assert_eq!(status.kind, StatusKind::Error);
    }

    #[tokio::test]
    async fn test_transport_failure_on_action_is_generic() {
        let (mut teller, _) = teller_with(
            MockService {
                balance: Err(transport()),
                ..MockService::existing()
            },
            false,
        );

        let status = submit(&mut teller, "1", Action::ViewBalance, None).await;
        assert_eq!(status.text(), messages::GENERIC_FAILURE);

        let (mut teller, _) = teller_with_api_error_without_body();
        let status = submit(&mut teller, "1", Action::Deposit, Some(5.0)).await;
        assert_eq!(status.text(), messages::GENERIC_FAILURE);
        assert_reset(&teller);
    }

    fn teller_with_api_error_without_body() -> (Teller<MockService, AutoAnswer>, Arc<MockService>)
    {
        teller_with(
            MockService {
                transact: Err(ServiceError::Api {
                    status: 500,
                    error: None,
                }),
                ..MockService::existing()
            },
            false,
        )
    }

    #[tokio::test]
    async fn test_check_failure_stops_sequence() {
        let (mut teller, service) = teller_with(
            MockService {
                exists: Err(transport()),
                ..MockService::existing()
            },
            true,
        );

        let status = submit(&mut teller, "42", Action::Deposit, Some(10.0)).await;

        assert_eq!(status.text(), messages::CHECK_FAILED);
        assert_eq!(service.calls(), vec![Call::Check("42".into())]);
        assert_reset(&teller);
    }

    #[tokio::test]
    async fn test_missing_amount_blocks_transaction() {
        for amount in [None, Some(0.0), Some(f64::NAN), Some(f64::INFINITY)] {
            for action in [Action::Deposit, Action::Withdraw] {
                let (mut teller, service) = teller_with(MockService::existing(), false);

                let status = submit(&mut teller, "7", action, amount).await;

                assert_eq!(status.text(), messages::AMOUNT_REQUIRED);
                assert_eq!(service.calls(), vec![Call::Check("7".into())]);
                assert_reset(&teller);
            }
        }
    }

    #[tokio::test]
    async fn test_declined_creation() {
        let (mut teller, service) = teller_with(MockService::missing(), false);

        let status = submit(&mut teller, "77", Action::Deposit, Some(20.0)).await;

        assert_eq!(status.text(), messages::CREATE_DECLINED);
        assert_eq!(service.calls(), vec![Call::Check("77".into())]);
        assert_reset(&teller);
    }

    #[tokio::test]
    async fn test_non_finite_deposit_opens_empty_account() {
        let (mut teller, service) = teller_with(MockService::missing(), true);

        submit(&mut teller, "91", Action::Deposit, Some(f64::INFINITY)).await;

        assert_eq!(
            service.calls(),
            vec![Call::Check("91".into()), Call::Create("91".into(), 0.0)]
        );
    }

    #[tokio::test]
    async fn test_accepted_creation_uses_deposit_amount() {
        let (mut teller, service) = teller_with(MockService::missing(), true);

        let status = submit(&mut teller, "88", Action::Deposit, Some(20.0)).await;

        assert_eq!(status.text(), messages::ACCOUNT_CREATED);
        assert_eq!(
            service.calls(),
            vec![Call::Check("88".into()), Call::Create("88".into(), 20.0)]
        );
        assert_reset(&teller);
    }

    #[tokio::test]
    async fn test_accepted_creation_from_withdraw_opens_empty() {
        for action in [Action::Withdraw, Action::ViewBalance] {
            let (mut teller, service) = teller_with(MockService::missing(), true);

            submit(&mut teller, "89", action, Some(300.0)).await;

            assert_eq!(
                service.calls(),
                vec![Call::Check("89".into()), Call::Create("89".into(), 0.0)]
            );
        }
    }

    #[tokio::test]
    async fn test_creation_failure() {
        let (mut teller, _) = teller_with(
            MockService {
                create: Err(ServiceError::Api {
                    status: 500,
                    error: Some("Duplicate entry".to_string()),
                }),
                ..MockService::missing()
            },
            true,
        );

        let status = submit(&mut teller, "90", Action::Deposit, Some(1.0)).await;

        assert_eq!(status.text(), messages::CREATE_FAILED);
        assert_reset(&teller);
    }

    #[tokio::test]
    async fn test_prompt_only_for_missing_accounts() {
        let service = Arc::new(MockService::existing());
        let mut teller = Teller::new(
            service,
            CountingPrompt {
                answer: true,
                asked: AtomicUsize::new(0),
            },
        );

        teller.select_action(Action::ViewBalance).unwrap();
        teller.set_account_number("1");
        teller.submit().await.unwrap();

        assert_eq!(teller.prompt.asked.load(Ordering::SeqCst), 0);
        assert_reset(&teller);
    }

    #[tokio::test]
    async fn test_submit_without_action() {
        let (mut teller, service) = teller_with(MockService::existing(), false);
        teller.set_account_number("1");

        assert_eq!(teller.submit().await, Err(TellerError::NoAction));
        assert!(service.calls().is_empty());
        assert_eq!(teller.input().account_number, "1");
    }

    #[tokio::test]
    async fn test_busy_rejects_submit_and_selection() {
        let (mut teller, service) = teller_with(MockService::existing(), false);
        teller.phase.send_replace(Phase::Submitting(Action::Deposit));

        assert_eq!(teller.submit().await, Err(TellerError::Busy));
        assert_eq!(teller.select_action(Action::Withdraw), Err(TellerError::Busy));
        assert_eq!(teller.phase().submit_label(), "Processing...");
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_busy_while_backend_call_pending() {
        let gate = Arc::new(Notify::new());
        let (mut teller, _) = teller_with(
            MockService {
                balance: Ok(10.0),
                gate: Some(gate.clone()),
                ..MockService::existing()
            },
            false,
        );
        teller.select_action(Action::ViewBalance).unwrap();
        teller.set_account_number("1");

        let mut phase = teller.subscribe();
        let observer = async {
            let seen = *phase.wait_for(|p| p.is_busy()).await.unwrap();
            gate.notify_one();
            seen
        };
        let (status, seen) = tokio::join!(teller.submit(), observer);

        assert_eq!(seen, Phase::Submitting(Action::ViewBalance));
        assert_eq!(seen.submit_label(), "Processing...");
        assert_eq!(status.unwrap().text(), "Balance: $10");
        assert_eq!(*phase.borrow(), Phase::Idle);
        assert_reset(&teller);
    }

    #[tokio::test]
    async fn test_dropped_submit_returns_to_idle() {
        let gate = Arc::new(Notify::new());
        let (mut teller, service) = teller_with(
            MockService {
                gate: Some(gate.clone()),
                ..MockService::existing()
            },
            false,
        );
        teller.select_action(Action::ViewBalance).unwrap();
        teller.set_account_number("1");

        let timed_out = tokio::time::timeout(Duration::from_millis(10), teller.submit()).await;

        assert!(timed_out.is_err());
        assert_eq!(
            service.calls(),
            vec![Call::Check("1".into()), Call::Balance("1".into())]
        );
        assert_reset(&teller);
        assert_eq!(teller.select_action(Action::Deposit), Ok(()));
    }

    #[test]
    fn test_select_action_clears_amount_and_status() {
        let (mut teller, _) = teller_with(MockService::existing(), false);
        teller.status = StatusMessage::info("old");
        teller.set_account_number("5");
        teller.set_amount(Some(10.0));

        teller.select_action(Action::Withdraw).unwrap();

        assert_eq!(teller.phase(), Phase::ActionSelected(Action::Withdraw));
        assert_eq!(teller.phase().submit_label(), "Submit");
        assert_eq!(teller.input().amount, None);
        assert_eq!(teller.input().account_number, "5");
        assert!(teller.status().is_empty());
    }

    fn record(id: i64, account: &str, kind: &str, amount: f64) -> TransactionRecord {
        TransactionRecord {
            id,
            account_number: account.to_string(),
            transaction_type: kind.to_string(),
            amount,
            transaction_date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, id as u32)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_history_filters_and_orders_newest_first() {
        let (teller, _) = teller_with(
            MockService {
                ledger: vec![
                    record(1, "123", "initial", 100.0),
                    record(2, "555", "initial", 0.0),
                    record(3, "123", "Withdraw", 40.0),
                ],
                ..MockService::existing()
            },
            false,
        );

        let rows = teller.history(Some("123")).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);

        assert_eq!(teller.history(None).await.unwrap().len(), 3);
    }
}
