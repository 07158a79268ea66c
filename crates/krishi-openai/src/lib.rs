// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible chat completions provider.
//!
//! Implements [`ModelProvider`] against any endpoint speaking the
//! `/chat/completions` wire format.

pub mod client;
pub mod types;

use async_trait::async_trait;
use krishi_config::model::ModelConfig;
use krishi_core::types::{ModelRequest, ModelResponse, TokenUsage};
use krishi_core::{AdapterType, HealthStatus, KrishiError, ModelProvider, PluginAdapter};
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatMessage, ChatRequest};

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Chat completions provider implementing [`ModelProvider`].
///
/// API key resolution order: config -> `OPENAI_API_KEY` env var -> error.
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a provider from the model configuration.
    pub fn new(config: &ModelConfig) -> Result<Self, KrishiError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = OpenAiClient::new(&api_key, &config.base_url, config.request_timeout())?;
        info!(
            model = config.model,
            endpoint = client.endpoint(),
            "chat completions provider initialized"
        );
        Ok(Self { client })
    }

    /// Creates a provider with an existing client.
    pub fn with_client(client: OpenAiClient) -> Self {
        Self { client }
    }

    fn to_chat_request(request: &ModelRequest) -> ChatRequest {
        ChatRequest {
            model: request.model.clone(),
            messages: vec![
                ChatMessage::system(request.system_prompt.clone()),
                ChatMessage::user(request.message.clone()),
            ],
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, KrishiError> {
        // No API call: health probes must not spend tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KrishiError> {
        debug!("chat completions provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    async fn complete(&self, request: ModelRequest) -> Result<ModelResponse, KrishiError> {
        let chat_request = Self::to_chat_request(&request);
        let response = self.client.complete_chat(&chat_request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| KrishiError::Provider {
                message: "response contained no message content".into(),
                source: None,
            })?;

        let usage = response.usage.unwrap_or_default();
        Ok(ModelResponse {
            id: response.id,
            content,
            model: response.model,
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}

/// Resolves the API key: non-empty config value first, then the environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, KrishiError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            KrishiError::Config(format!(
                "model API key not found. Set model.api_key in config or the {API_KEY_ENV} environment variable."
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_request() -> ModelRequest {
        ModelRequest {
            model: "gpt-4o-mini".into(),
            system_prompt: "You are an agricultural expert.".into(),
            message: "rice pest".into(),
            max_tokens: 128,
        }
    }

    #[test]
    fn resolve_api_key_from_config() {
        assert_eq!(resolve_api_key(&Some("sk-test-123".into())).unwrap(), "sk-test-123");
    }

    #[test]
    #[serial]
    fn resolve_api_key_none_falls_back_to_env() {
        // SAFETY: test-only env mutation, serialized with the other env tests.
        unsafe { std::env::set_var(API_KEY_ENV, "sk-from-env") };
        let result = resolve_api_key(&None);
        unsafe { std::env::remove_var(API_KEY_ENV) };

        assert_eq!(result.unwrap(), "sk-from-env");
    }

    #[test]
    #[serial]
    fn empty_config_and_env_is_rejected() {
        unsafe { std::env::set_var(API_KEY_ENV, "") };
        let result = resolve_api_key(&Some(String::new()));
        unsafe { std::env::remove_var(API_KEY_ENV) };

        let err = result.unwrap_err().to_string();
        assert!(err.contains(API_KEY_ENV), "got: {err}");
    }

    #[test]
    fn chat_request_carries_system_and_user_message() {
        let chat = OpenAiProvider::to_chat_request(&test_request());
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, "system");
        assert_eq!(chat.messages[1].content.as_deref(), Some("rice pest"));
        assert_eq!(chat.max_tokens, 128);
    }

    #[test]
    fn provider_metadata() {
        let client = OpenAiClient::new("k", "http://localhost:1", Duration::from_secs(1)).unwrap();
        let provider = OpenAiProvider::with_client(client);
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.adapter_type(), AdapterType::Provider);
    }

    #[tokio::test]
    async fn complete_maps_first_choice_and_usage() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "model": "gpt-4o-mini",
                "choices": [{"message": {"role": "assistant", "content": "Use neem oil."}}],
                "usage": {"prompt_tokens": 30, "completion_tokens": 5}
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new("k", &server.uri(), Duration::from_secs(5)).unwrap();
        let provider = OpenAiProvider::with_client(client);
        let response = provider.complete(test_request()).await.unwrap();
        assert_eq!(response.content, "Use neem oil.");
        assert_eq!(response.usage.input_tokens, 30);
        assert_eq!(response.usage.output_tokens, 5);
    }

    #[tokio::test]
    async fn complete_without_choices_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-2", "model": "gpt-4o-mini", "choices": []
            })))
            .mount(&server)
            .await;

        let client = OpenAiClient::new("k", &server.uri(), Duration::from_secs(5)).unwrap();
        let provider = OpenAiProvider::with_client(client);
        let err = provider.complete(test_request()).await.unwrap_err();
        assert!(err.to_string().contains("no message content"), "got: {err}");
    }
}
