use async_trait::async_trait;

use crate::domain::{CompletionSettings, DomainError};

/// A hosted model that turns a rendered prompt into generated text.
///
/// Implementors encapsulate transport, authentication, and vendor-specific
/// payloads. Errors are reported as [`DomainError::ProviderError`] (or
/// [`DomainError::ConfigError`] for unusable configuration) and are passed
/// back to callers untouched.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Submit `prompt` and return the generated text.
    async fn complete(
        &self,
        prompt: &str,
        settings: &CompletionSettings,
    ) -> Result<String, DomainError>;

    /// Short provider name used in logs.
    fn name(&self) -> &str;
}
