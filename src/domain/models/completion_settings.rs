use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.8;

/// Settings bundle handed to a completion provider with every prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSettings {
    service_id: String,
    model: Option<String>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

impl CompletionSettings {
    pub fn new(service_id: impl Into<String>) -> Self {
        Self {
            service_id: service_id.into(),
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }

    /// Override the provider's configured model (or Azure deployment).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn top_p(&self) -> f32 {
        self.top_p
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_tokens == 0 {
            return Err(DomainError::invalid_input("max_tokens must be greater than 0"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(DomainError::invalid_input(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(DomainError::invalid_input(format!(
                "top_p must be within 0.0..=1.0, got {}",
                self.top_p
            )));
        }
        Ok(())
    }
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self::new("chat")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CompletionSettings::default();

        assert_eq!(settings.service_id(), "chat");
        assert_eq!(settings.model(), None);
        assert_eq!(settings.max_tokens(), DEFAULT_MAX_TOKENS);
        assert_eq!(settings.temperature(), DEFAULT_TEMPERATURE);
        assert_eq!(settings.top_p(), DEFAULT_TOP_P);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let settings = CompletionSettings::new("template_language")
            .with_model("gpt-4o")
            .with_max_tokens(100)
            .with_temperature(0.0)
            .with_top_p(1.0);

        assert_eq!(settings.service_id(), "template_language");
        assert_eq!(settings.model(), Some("gpt-4o"));
        assert_eq!(settings.max_tokens(), 100);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(CompletionSettings::default()
            .with_max_tokens(0)
            .validate()
            .unwrap_err()
            .is_invalid_input());
        assert!(CompletionSettings::default()
            .with_temperature(2.5)
            .validate()
            .is_err());
        assert!(CompletionSettings::default()
            .with_top_p(-0.1)
            .validate()
            .is_err());
    }
}
