use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::CompletionProvider;
use crate::domain::{CompletionSettings, DomainError, CHAT_HISTORY_TAG};

const USER_LABEL: &str = "User:";
const ASSISTANT_LABEL: &str = "ChatBot:";

/// In-process [`CompletionProvider`] for tests and offline runs.
///
/// Replies are served from a queue in order. Once the queue is empty the
/// provider echoes the most recent `User:` line of the prompt. Every prompt
/// received is recorded.
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    failure: Option<String>,
}

impl ScriptedCompletion {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
            failure: None,
        }
    }

    pub fn echo() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// A provider whose every call fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::echo()
        }
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    /// Recover the user input from a prompt laid out by `ChatPrompt`: the
    /// text after the `User:` label that follows the history block, up to the
    /// closing `ChatBot:` label. History text is escaped, so the first closing
    /// tag is always the real one.
    fn echo_reply(prompt: &str) -> String {
        let history_close = format!("</{CHAT_HISTORY_TAG}>\n");
        let tail = prompt
            .find(&history_close)
            .map(|i| &prompt[i + history_close.len()..])
            .unwrap_or(prompt);
        let input = tail
            .find(USER_LABEL)
            .map(|i| &tail[i + USER_LABEL.len()..])
            .unwrap_or_default();
        let input = input.strip_suffix(ASSISTANT_LABEL).unwrap_or(input).trim();
        format!("You said: {input}")
    }
}

impl Default for ScriptedCompletion {
    fn default() -> Self {
        Self::echo()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(
        &self,
        prompt: &str,
        _settings: &CompletionSettings,
    ) -> Result<String, DomainError> {
        self.prompts.lock().await.push(prompt.to_string());

        if let Some(message) = &self.failure {
            return Err(DomainError::provider(message.clone()));
        }

        let reply = match self.replies.lock().await.pop_front() {
            Some(reply) => reply,
            None => Self::echo_reply(prompt),
        };
        debug!("ScriptedCompletion reply: {}", reply);
        Ok(reply)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_in_order_then_echo() {
        let provider = ScriptedCompletion::new(["one", "two"]);
        let settings = CompletionSettings::default();

        assert_eq!(provider.complete("User: a\nChatBot:", &settings).await.unwrap(), "one");
        assert_eq!(provider.complete("User: b\nChatBot:", &settings).await.unwrap(), "two");
        assert_eq!(
            provider.complete("User: c\nChatBot:", &settings).await.unwrap(),
            "You said: c"
        );
        assert_eq!(provider.prompts().await.len(), 3);
    }

    #[test]
    fn test_echo_keeps_multi_line_input() {
        use crate::domain::{ChatPrompt, ChatTranscript};

        let mut transcript = ChatTranscript::with_system("sys").unwrap();
        transcript.append_user("User: earlier").unwrap();
        transcript.append_assistant("ok").unwrap();
        let prompt = ChatPrompt::new().build(&transcript, "a\nUser: b\nc");

        assert_eq!(
            ScriptedCompletion::echo_reply(&prompt),
            "You said: a\nUser: b\nc"
        );
    }

    #[tokio::test]
    async fn test_failing_records_prompt() {
        let provider = ScriptedCompletion::failing("boom");

        let err = provider
            .complete("User: hi\nChatBot:", &CompletionSettings::default())
            .await
            .unwrap_err();

        assert!(err.is_provider_error());
        assert_eq!(provider.prompts().await, vec!["User: hi\nChatBot:".to_string()]);
    }
}
