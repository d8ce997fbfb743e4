use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::ProviderError(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::ProviderError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_build_matching_variants() {
        assert!(DomainError::invalid_input("x").is_invalid_input());
        assert!(DomainError::provider("x").is_provider_error());
        assert!(matches!(DomainError::parse("x"), DomainError::ParseError(_)));
        assert!(matches!(DomainError::config("x"), DomainError::ConfigError(_)));
        assert!(!DomainError::config("x").is_provider_error());
    }

    #[test]
    fn test_display_prefixes_category() {
        assert_eq!(
            DomainError::config("ANTHROPIC_API_KEY is not set").to_string(),
            "Configuration error: ANTHROPIC_API_KEY is not set"
        );
        assert_eq!(DomainError::parse("bad").to_string(), "Parse error: bad");
    }
}
