use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::CompletionProvider;
use crate::domain::{CompletionSettings, DomainError};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-haiku-4-5";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

/// [`CompletionProvider`] backed by the Anthropic Messages API (or any
/// compatible endpoint).
///
/// The rendered prompt is sent as a single `user` message; the history it
/// carries is already embedded in the prompt text.
///
/// ```text
/// ANTHROPIC_API_KEY=sk-ant-...
/// ANTHROPIC_BASE_URL=https://api.anthropic.com   # optional
/// ANTHROPIC_MODEL=claude-haiku-4-5               # optional
/// ```
pub struct AnthropicCompletionProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Full endpoint URL (base + MESSAGES_PATH).
    url: String,
}

impl AnthropicCompletionProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), MESSAGES_PATH);
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: model.into(),
            url,
        }
    }

    /// Construct from environment variables:
    ///
    /// | Variable             | Default                     |
    /// |----------------------|-----------------------------|
    /// | `ANTHROPIC_API_KEY`  | required                    |
    /// | `ANTHROPIC_BASE_URL` | `https://api.anthropic.com` |
    /// | `ANTHROPIC_MODEL`    | `claude-haiku-4-5`          |
    pub fn from_env() -> Result<Self, DomainError> {
        let key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| DomainError::config("ANTHROPIC_API_KEY is not set"))?;
        let base = std::env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self::new(key, model, base))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_request<'a>(
        &'a self,
        prompt: &'a str,
        settings: &'a CompletionSettings,
    ) -> ApiRequest<'a> {
        ApiRequest {
            model: settings.model().unwrap_or(self.model.as_str()),
            max_tokens: settings.max_tokens(),
            temperature: settings.temperature(),
            top_p: settings.top_p(),
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        }
    }

    fn extract_text(response: ApiResponse) -> String {
        response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("")
    }
}

#[async_trait]
impl CompletionProvider for AnthropicCompletionProvider {
    async fn complete(
        &self,
        prompt: &str,
        settings: &CompletionSettings,
    ) -> Result<String, DomainError> {
        let request = self.build_request(prompt, settings);
        debug!("AnthropicCompletionProvider: POST {} model={}", self.url, request.model);

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::provider(format!("Anthropic request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("AnthropicCompletionProvider: API returned {status}: {body}");
            return Err(DomainError::provider(format!("Anthropic API returned {status}")));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::provider(format!("Failed to parse Anthropic response: {e}"))
        })?;

        Ok(Self::extract_text(api_response))
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_path() {
        let provider = AnthropicCompletionProvider::new("key", "model", "http://localhost:1234/");
        assert_eq!(provider.url(), "http://localhost:1234/v1/messages");
    }

    #[test]
    fn request_uses_settings_and_single_user_message() {
        let provider = AnthropicCompletionProvider::new("key", "default-model", DEFAULT_BASE_URL);
        let settings = CompletionSettings::default()
            .with_max_tokens(100)
            .with_temperature(0.2);

        let request = provider.build_request("prompt text", &settings);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "default-model");
        assert_eq!(json["max_tokens"], 100);
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "prompt text");
    }

    #[test]
    fn request_prefers_model_from_settings() {
        let provider = AnthropicCompletionProvider::new("key", "default-model", DEFAULT_BASE_URL);
        let settings = CompletionSettings::default().with_model("override");

        let request = provider.build_request("p", &settings);

        assert_eq!(request.model, "override");
    }

    #[test]
    fn extract_text_joins_text_blocks() {
        let response: ApiResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"Hello, "},{"type":"tool_use","id":"x"},{"type":"text","text":"world"}]}"#,
        )
        .unwrap();

        assert_eq!(AnthropicCompletionProvider::extract_text(response), "Hello, world");
    }
}
