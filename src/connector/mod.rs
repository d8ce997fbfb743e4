//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Completion providers (Anthropic, Azure OpenAI, scripted mock)
//! - Command-line API (container, router, controllers)

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
