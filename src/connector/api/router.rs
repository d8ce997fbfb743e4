use anyhow::Result;
use tokio::io::BufReader;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, ChatOptions, RenderController};

pub struct Router<'a> {
    chat_controller: ChatController<'a>,
    ask_controller: AskController<'a>,
    render_controller: RenderController,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chat_controller: ChatController::new(container),
            ask_controller: AskController::new(container),
            render_controller: RenderController::new(),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chat {
                show_prompt,
                show_history,
            } => {
                let stdin = BufReader::new(tokio::io::stdin());
                let mut stdout = tokio::io::stdout();
                let options = ChatOptions {
                    show_prompt,
                    show_history,
                    show_progress: true,
                };
                self.chat_controller.chat(stdin, &mut stdout, options).await
            }
            Commands::Ask {
                message,
                show_prompt,
            } => self.ask_controller.ask(message, show_prompt).await,
            Commands::Render { turn } => self.render_controller.render(turn),
        }
    }
}
