pub mod ask_controller;
pub mod chat_controller;
pub mod render_controller;

pub use ask_controller::AskController;
pub use chat_controller::{ChatController, ChatOptions};
pub use render_controller::RenderController;
