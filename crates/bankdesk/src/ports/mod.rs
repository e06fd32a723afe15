//! Ports (Interfaces)
//!
//! How the teller reaches the outside world: the account backend and the user.
//!
//! Implementations live in `adapters/` and in the CLI crate.

mod account_service;
mod prompt;

pub use account_service::*;
pub use prompt::*;
