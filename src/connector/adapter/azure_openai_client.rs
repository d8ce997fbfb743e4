use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::CompletionProvider;
use crate::domain::{CompletionSettings, DomainError};

const DEFAULT_API_VERSION: &str = "2024-02-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    messages: Vec<ApiMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// [`CompletionProvider`] for an Azure OpenAI chat deployment.
///
/// The deployment is addressed by URL, so [`CompletionSettings::model`] (when
/// set) selects the deployment name instead of the configured one.
pub struct AzureOpenAiCompletionProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    deployment: String,
    api_version: String,
}

impl AzureOpenAiCompletionProvider {
    pub fn new(
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let endpoint: String = endpoint.into();
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            deployment: deployment.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Construct from environment variables:
    ///
    /// | Variable                            | Default      |
    /// |-------------------------------------|--------------|
    /// | `AZURE_OPENAI_ENDPOINT`             | required     |
    /// | `AZURE_OPENAI_API_KEY`              | required     |
    /// | `AZURE_OPENAI_CHAT_DEPLOYMENT_NAME` | required     |
    /// | `AZURE_OPENAI_API_VERSION`          | `2024-02-01` |
    pub fn from_env() -> Result<Self, DomainError> {
        let endpoint = required_env("AZURE_OPENAI_ENDPOINT")?;
        let api_key = required_env("AZURE_OPENAI_API_KEY")?;
        let deployment = required_env("AZURE_OPENAI_CHAT_DEPLOYMENT_NAME")?;

        let provider = Self::new(endpoint, deployment, api_key);
        Ok(match std::env::var("AZURE_OPENAI_API_VERSION") {
            Ok(version) => provider.with_api_version(version),
            Err(_) => provider,
        })
    }

    pub fn chat_url(&self, deployment: Option<&str>) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint,
            deployment.unwrap_or(self.deployment.as_str()),
            self.api_version
        )
    }

    fn build_request<'a>(prompt: &'a str, settings: &CompletionSettings) -> ApiRequest<'a> {
        ApiRequest {
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: settings.max_tokens(),
            temperature: settings.temperature(),
            top_p: settings.top_p(),
        }
    }

    fn extract_text(response: ApiResponse) -> Result<String, DomainError> {
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| DomainError::provider("Azure OpenAI response contained no choices"))
    }
}

fn required_env(name: &str) -> Result<String, DomainError> {
    std::env::var(name).map_err(|_| DomainError::config(format!("{name} is not set")))
}

#[async_trait]
impl CompletionProvider for AzureOpenAiCompletionProvider {
    async fn complete(
        &self,
        prompt: &str,
        settings: &CompletionSettings,
    ) -> Result<String, DomainError> {
        let url = self.chat_url(settings.model());
        let request = Self::build_request(prompt, settings);
        debug!("AzureOpenAiCompletionProvider: POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::provider(format!("Azure OpenAI request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("AzureOpenAiCompletionProvider: API returned {status}: {body}");
            return Err(DomainError::provider(format!(
                "Azure OpenAI API returned {status}"
            )));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::provider(format!("Failed to parse Azure OpenAI response: {e}"))
        })?;

        Self::extract_text(api_response)
    }

    fn name(&self) -> &str {
        "azure-openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AzureOpenAiCompletionProvider {
        AzureOpenAiCompletionProvider::new("https://example.openai.azure.com/", "gpt-35", "key")
    }

    #[test]
    fn chat_url_targets_deployment() {
        assert_eq!(
            provider().chat_url(None),
            "https://example.openai.azure.com/openai/deployments/gpt-35/chat/completions?api-version=2024-02-01"
        );
    }

    #[test]
    fn chat_url_uses_settings_deployment_and_version() {
        let provider = provider().with_api_version("2024-06-01");
        assert_eq!(
            provider.chat_url(Some("gpt-4o")),
            "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-06-01"
        );
    }

    #[test]
    fn request_carries_sampling_settings() {
        let settings = CompletionSettings::default().with_max_tokens(100).with_top_p(0.5);
        let json = serde_json::to_value(AzureOpenAiCompletionProvider::build_request(
            "prompt", &settings,
        ))
        .unwrap();

        assert_eq!(json["max_tokens"], 100);
        assert_eq!(json["top_p"], 0.5);
        assert_eq!(json["messages"][0]["content"], "prompt");
    }

    #[test]
    fn extract_text_reads_first_choice() {
        let response: ApiResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Hi there"}}]}"#,
        )
        .unwrap();

        assert_eq!(
            AzureOpenAiCompletionProvider::extract_text(response).unwrap(),
            "Hi there"
        );
    }

    #[test]
    fn extract_text_errors_without_choices() {
        let response: ApiResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();

        let err = AzureOpenAiCompletionProvider::extract_text(response).unwrap_err();
        assert!(err.is_provider_error());
    }
}
