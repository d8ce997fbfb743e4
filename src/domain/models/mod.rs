mod chat_prompt;
mod completion_settings;
mod role;
mod transcript;
mod turn;

pub use chat_prompt::*;
pub use completion_settings::*;
pub use role::*;
pub use transcript::*;
pub use turn::*;
