//! Domain Entities
//!
//! - SessionInput: the form the user fills in
//! - TransactionRecord: ledger row reported by the backend

mod session;
mod transaction;

pub use session::*;
pub use transaction::*;
