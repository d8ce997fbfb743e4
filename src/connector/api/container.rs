use std::sync::Arc;

use anyhow::Result;
use clap::ValueEnum;
use tracing::debug;

use crate::application::{ChatTurnUseCase, CompletionProvider};
use crate::domain::{ChatTranscript, CompletionSettings};
use crate::{AnthropicCompletionProvider, AzureOpenAiCompletionProvider, ScriptedCompletion};

/// System directive used when none is given on the command line.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful chatbot.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderKind {
    /// Anthropic Messages API (`ANTHROPIC_*` variables)
    Anthropic,
    /// Azure OpenAI chat deployment (`AZURE_OPENAI_*` variables)
    Azure,
    /// Offline scripted provider that echoes the input
    Mock,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Azure => "azure",
            ProviderKind::Mock => "mock",
        }
    }
}

pub struct ContainerConfig {
    pub provider: ProviderKind,
    pub service_id: String,
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub system_prompt: String,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        let settings = CompletionSettings::default();
        Self {
            provider: ProviderKind::Anthropic,
            service_id: settings.service_id().to_string(),
            model: None,
            max_tokens: settings.max_tokens(),
            temperature: settings.temperature(),
            top_p: settings.top_p(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Wires configuration, the selected provider, and the use cases together.
///
/// The provider is only constructed when a command actually needs one, so
/// provider-free commands work without credentials in the environment.
pub struct Container {
    settings: CompletionSettings,
    provider_override: Option<Arc<dyn CompletionProvider>>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        let mut settings = CompletionSettings::new(config.service_id.clone())
            .with_max_tokens(config.max_tokens)
            .with_temperature(config.temperature)
            .with_top_p(config.top_p);
        if let Some(model) = config.model.as_deref() {
            settings = settings.with_model(model);
        }
        settings.validate()?;

        Ok(Self {
            settings,
            provider_override: None,
            config,
        })
    }

    /// Use an already-built provider instead of the configured kind.
    pub fn with_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.provider_override = Some(provider);
        self
    }

    pub fn provider(&self) -> Result<Arc<dyn CompletionProvider>> {
        if let Some(provider) = &self.provider_override {
            return Ok(provider.clone());
        }

        let provider: Arc<dyn CompletionProvider> = match self.config.provider {
            ProviderKind::Anthropic => {
                debug!("Using Anthropic completion provider");
                Arc::new(AnthropicCompletionProvider::from_env()?)
            }
            ProviderKind::Azure => {
                debug!("Using Azure OpenAI completion provider");
                Arc::new(AzureOpenAiCompletionProvider::from_env()?)
            }
            ProviderKind::Mock => {
                debug!("Using scripted mock completion provider");
                Arc::new(ScriptedCompletion::echo())
            }
        };
        Ok(provider)
    }

    pub fn chat_use_case(&self) -> Result<ChatTurnUseCase> {
        Ok(ChatTurnUseCase::new(self.provider()?, self.settings.clone()))
    }

    /// A fresh transcript seeded with the configured system directive, or an
    /// empty one when the directive is blank.
    pub fn new_transcript(&self) -> Result<ChatTranscript> {
        if self.config.system_prompt.trim().is_empty() {
            return Ok(ChatTranscript::new());
        }
        Ok(ChatTranscript::with_system(self.config.system_prompt.as_str())?)
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.config.provider
    }
}
