mod anthropic_client;
mod azure_openai_client;
mod scripted_completion;

pub use anthropic_client::*;
pub use azure_openai_client::*;
pub use scripted_completion::*;
