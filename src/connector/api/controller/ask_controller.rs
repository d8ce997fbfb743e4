use anyhow::Result;

use super::super::Container;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Run a single turn against a fresh transcript and return the reply.
    pub async fn ask(&self, message: String, show_prompt: bool) -> Result<String> {
        let use_case = self.container.chat_use_case()?;
        let mut transcript = self.container.new_transcript()?;

        let mut output = String::new();
        if show_prompt {
            output.push_str("--- Rendered Prompt ---\n");
            output.push_str(&use_case.preview_prompt(&transcript, &message));
            output.push_str("\n--- Completion ---\n");
        }

        let reply = use_case.execute(&mut transcript, &message).await?;
        output.push_str(&reply);
        Ok(output)
    }
}
