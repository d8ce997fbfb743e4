use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};
use uuid::Uuid;

use super::super::Container;

const USER_PROMPT: &str = "User:> ";
const ASSISTANT_PREFIX: &str = "ChatBot:> ";

#[derive(Debug, Clone, Copy, Default)]
pub struct ChatOptions {
    pub show_prompt: bool,
    pub show_history: bool,
    pub show_progress: bool,
}

/// Interactive chat loop: one line of input per user turn.
///
/// Blank lines are skipped, `/history` prints the rendered transcript, and
/// `exit`, `quit` or end of input close the session. A failed turn is
/// reported and the loop continues with the transcript unchanged.
pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn chat<R, W>(&self, input: R, output: &mut W, options: ChatOptions) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let use_case = self.container.chat_use_case()?;
        let mut transcript = self.container.new_transcript()?;
        let session_id = Uuid::new_v4();

        info!(
            "Starting chat session {} with {} provider",
            session_id,
            use_case.provider_name()
        );
        output
            .write_all(b"Type a message, /history to show the conversation, exit to quit.\n")
            .await?;

        let mut lines = input.lines();
        let mut completed_turns = 0usize;

        loop {
            output.write_all(USER_PROMPT.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                output.write_all(b"\n").await?;
                break;
            };
            let line = line.trim();

            match line {
                "" => continue,
                "exit" | "quit" => break,
                "/history" => {
                    output
                        .write_all(format!("{}\n", transcript.render()).as_bytes())
                        .await?;
                    continue;
                }
                _ => {}
            }

            if options.show_prompt {
                let prompt = use_case.preview_prompt(&transcript, line);
                output
                    .write_all(format!("--- Rendered Prompt ---\n{prompt}\n").as_bytes())
                    .await?;
            }

            let spinner = options.show_progress.then(thinking_spinner);
            let result = use_case.execute(&mut transcript, line).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }

            match result {
                Ok(reply) => {
                    completed_turns += 1;
                    output
                        .write_all(format!("{ASSISTANT_PREFIX}{reply}\n").as_bytes())
                        .await?;
                }
                Err(e) => {
                    warn!("Chat turn failed in session {}: {}", session_id, e);
                    output.write_all(format!("Error: {e}\n").as_bytes()).await?;
                }
            }
        }

        output.flush().await?;
        info!(
            "Chat session {} ended after {} turns",
            session_id, completed_turns
        );

        let mut summary = format!("Session ended after {completed_turns} turn(s).");
        if options.show_history {
            summary.push('\n');
            summary.push_str(&transcript.render());
        }
        Ok(summary)
    }
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
