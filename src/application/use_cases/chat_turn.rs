use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::{CompletionProvider, SharedTranscript};
use crate::domain::{ChatPrompt, ChatTranscript, CompletionSettings, DomainError, Role};

/// Runs one conversational turn: render the history plus the new input,
/// ask the provider, and record the exchange.
pub struct ChatTurnUseCase {
    provider: Arc<dyn CompletionProvider>,
    settings: CompletionSettings,
    prompt: ChatPrompt,
}

impl ChatTurnUseCase {
    pub fn new(provider: Arc<dyn CompletionProvider>, settings: CompletionSettings) -> Self {
        Self {
            provider,
            settings,
            prompt: ChatPrompt::default(),
        }
    }

    pub fn with_prompt(mut self, prompt: ChatPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The exact prompt [`ChatTurnUseCase::execute`] would submit for this input.
    pub fn preview_prompt(&self, transcript: &ChatTranscript, user_input: &str) -> String {
        self.prompt.build(transcript, user_input)
    }

    /// Submit `user_input` with the current history and append both the input
    /// and the reply once the provider has answered.
    ///
    /// The transcript is left untouched when validation or the provider fails.
    pub async fn execute(
        &self,
        transcript: &mut ChatTranscript,
        user_input: &str,
    ) -> Result<String, DomainError> {
        if user_input.trim().is_empty() {
            return Err(DomainError::invalid_input("user input must not be empty"));
        }
        self.settings.validate()?;

        let prompt = self.preview_prompt(transcript, user_input);
        debug!("Rendered prompt:\n{}", prompt);

        info!(
            "Sending turn {} to {} (service_id={}, history={} turns)",
            transcript.turns().filter(|t| t.role() == Role::User).count() + 1,
            self.provider.name(),
            self.settings.service_id(),
            transcript.len()
        );

        let start_time = Instant::now();
        let reply = self.provider.complete(&prompt, &self.settings).await?;

        if reply.trim().is_empty() {
            warn!("{} returned an empty completion", self.provider.name());
            return Err(DomainError::provider(format!(
                "{} returned an empty completion",
                self.provider.name()
            )));
        }

        transcript.append_user(user_input)?;
        transcript.append_assistant(reply.as_str())?;

        info!(
            "Received {} bytes in {:.2}s",
            reply.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(reply)
    }

    /// Same as [`ChatTurnUseCase::execute`] for a transcript shared between
    /// tasks. The lock is held for the whole turn so concurrent turns cannot
    /// interleave their user and assistant entries.
    pub async fn execute_shared(
        &self,
        transcript: &SharedTranscript,
        user_input: &str,
    ) -> Result<String, DomainError> {
        let mut guard = transcript.lock().await;
        self.execute(&mut guard, user_input).await
    }
}
