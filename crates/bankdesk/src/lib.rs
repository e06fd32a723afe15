//! Bankdesk Library
//!
//! Teller orchestration for a toy banking backend.
//!
//! # Architecture
//!
//! Same layering as a hexagonal service, scaled down to a client:
//!
//! - **Domain Layer** (`domain/`): session state and wire-independent types
//!   - `entities/`: SessionInput, TransactionRecord
//!   - `value_objects/`: Action, Phase, StatusMessage
//!   - `errors/`: ServiceError, TellerError
//!
//! - **Ports** (`ports/`): the account service and the creation prompt
//!
//! - **Application** (`application/`): the `Teller` submit flow
//!
//! - **Adapters** (`adapters/`): reqwest implementation of `AccountService`
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bankdesk::{Action, AutoAnswer, HttpAccountService, Teller};
//!
//! let service = HttpAccountService::new("http://127.0.0.1:5000");
//! let mut teller = Teller::new(Arc::new(service), AutoAnswer(true));
//! teller.select_action(Action::Deposit)?;
//! teller.set_account_number("123");
//! teller.set_amount(Some(50.0));
//! let status = teller.submit().await?;
//! println!("{}", status);
//! ```

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use adapters::HttpAccountService;
pub use application::Teller;
pub use domain::{
    messages, Action, Phase, ServiceError, SessionInput, StatusKind, StatusMessage, TellerError,
    TransactionRecord, TransactionType,
};
pub use ports::{AccountService, AutoAnswer, CreationPrompt, TransactionOutcome};
