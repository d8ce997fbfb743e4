use super::ChatTranscript;

/// Preamble placed ahead of the history in every prompt.
pub const DEFAULT_PREAMBLE: &str = "\
ChatBot can have a conversation with you about any topic.
It can give explicit instructions or say 'I don't know' if it does not have an answer.";

const USER_LABEL: &str = "User:";
const ASSISTANT_LABEL: &str = "ChatBot:";

/// The prompt submitted for one turn: preamble, rendered history, then the
/// new user input and an open assistant label for the model to complete.
#[derive(Debug, Clone)]
pub struct ChatPrompt {
    preamble: String,
}

impl ChatPrompt {
    pub fn new() -> Self {
        Self {
            preamble: DEFAULT_PREAMBLE.to_string(),
        }
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    pub fn build(&self, transcript: &ChatTranscript, user_input: &str) -> String {
        let mut prompt = String::new();

        if !self.preamble.trim().is_empty() {
            prompt.push_str(self.preamble.trim_end());
            prompt.push_str("\n\n");
        }

        prompt.push_str(&transcript.render());
        prompt.push('\n');
        prompt.push_str(&format!("{USER_LABEL} {user_input}\n"));
        prompt.push_str(ASSISTANT_LABEL);
        prompt
    }
}

impl Default for ChatPrompt {
    fn default() -> Self {
        Self::new()
    }
}
