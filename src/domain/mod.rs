//! # Domain Layer
//!
//! Conversation models and the error type shared by every layer.
//! This layer has no knowledge of providers, HTTP, or the terminal.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
