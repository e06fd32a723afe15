//! Domain Layer
//!
//! Session state, actions and error types without any transport concerns.

pub mod entities;
pub mod errors;
pub mod messages;
pub mod value_objects;

// Re-exports for convenience
pub use entities::*;
pub use errors::*;
pub use value_objects::*;
