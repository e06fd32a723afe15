//! Application Layer
//!
//! Use cases built on the domain and the ports.

mod teller;

pub use teller::Teller;
