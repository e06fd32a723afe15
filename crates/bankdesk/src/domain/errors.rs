//! Domain Errors
//!
//! Error types for account service calls and teller usage.

use thiserror::Error;

/// Failure talking to the account service
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {}", .error.as_deref().unwrap_or("no error message"))]
    Api { status: u16, error: Option<String> },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Error string supplied by the server, if the response carried one
    pub fn server_error(&self) -> Option<&str> {
        match self {
            Self::Api { error, .. } => error.as_deref().filter(|e| !e.is_empty()),
            _ => None,
        }
    }
}

/// Teller misuse; raised before any network call is made
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TellerError {
    #[error("A request is already in progress")]
    Busy,

    #[error("No action selected")]
    NoAction,
}
