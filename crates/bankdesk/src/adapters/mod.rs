//! Adapters
//!
//! Infrastructure implementations of the ports.

mod http;

pub use http::HttpAccountService;
