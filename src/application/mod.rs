//! # Application Layer
//!
//! Use cases coordinating the conversation models with a completion provider.

pub mod interfaces;
mod shared_transcript;
pub mod use_cases;

pub use interfaces::*;
pub use shared_transcript::*;
pub use use_cases::*;
