//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod action;
mod phase;
mod status;

pub use action::*;
pub use phase::*;
pub use status::*;
