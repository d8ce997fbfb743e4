pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{ChatTurnUseCase, CompletionProvider, SharedTranscript};

pub use cli::Commands;

pub use connector::{
    AnthropicCompletionProvider, AzureOpenAiCompletionProvider, ChatOptions, Container,
    ContainerConfig, ProviderKind, Router, ScriptedCompletion,
};

pub use domain::{
    ChatPrompt, ChatTranscript, CompletionSettings, DomainError, Role, Turn, CHAT_HISTORY_TAG,
};
