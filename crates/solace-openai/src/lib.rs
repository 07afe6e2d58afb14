// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible language model adapter.
//!
//! Implements [`ProviderAdapter`] for the hosted backends that speak the
//! Chat Completions protocol: Azure OpenAI, Groq and OpenRouter.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use solace_core::{
    AdapterType, HealthStatus, PluginAdapter, ProviderAdapter, ProviderRequest, ProviderResponse,
    SolaceError, TokenUsage,
};
use tracing::debug;

pub use client::{AuthStyle, OpenAiClient};
use types::{ChatCompletionRequest, ChatMessage};

/// Groq's OpenAI-compatible API root.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// OpenRouter's API root.
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Language model adapter over an [`OpenAiClient`].
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    name: &'static str,
    client: OpenAiClient,
    model: Option<String>,
    extra: serde_json::Map<String, serde_json::Value>,
}

impl OpenAiProvider {
    /// Azure OpenAI: the deployment in the URL selects the model.
    pub fn azure(
        api_key: &str,
        endpoint: &str,
        deployment: &str,
        api_version: &str,
        timeout: Duration,
    ) -> Result<Self, SolaceError> {
        let base_url = format!(
            "{}/openai/deployments/{deployment}",
            endpoint.trim_end_matches('/')
        );
        let client = OpenAiClient::new("azure", base_url, api_key, AuthStyle::ApiKeyHeader, timeout)?
            .with_query("api-version", api_version);
        Ok(Self {
            name: "azure",
            client,
            model: None,
            extra: serde_json::Map::new(),
        })
    }

    /// Groq hosted models.
    pub fn groq(api_key: &str, model: &str, timeout: Duration) -> Result<Self, SolaceError> {
        let client = OpenAiClient::new("groq", GROQ_BASE_URL, api_key, AuthStyle::Bearer, timeout)?;
        Ok(Self {
            name: "groq",
            client,
            model: Some(model.to_string()),
            extra: serde_json::Map::new(),
        })
    }

    /// OpenRouter, with reasoning enabled for models that support it.
    pub fn openrouter(api_key: &str, model: &str, timeout: Duration) -> Result<Self, SolaceError> {
        let client = OpenAiClient::new(
            "openrouter",
            OPENROUTER_BASE_URL,
            api_key,
            AuthStyle::Bearer,
            timeout,
        )?;
        let mut extra = serde_json::Map::new();
        extra.insert(
            "reasoning".to_string(),
            serde_json::json!({ "enabled": true }),
        );
        Ok(Self {
            name: "openrouter",
            client,
            model: Some(model.to_string()),
            extra,
        })
    }

    /// Overrides the API root (self-hosted gateways, wiremock in tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    pub fn client(&self) -> &OpenAiClient {
        &self.client
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn to_wire(&self, request: ProviderRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system,
            });
        }
        messages.extend(request.messages.into_iter().map(|m| ChatMessage {
            role: m.role.to_string(),
            content: m.content,
        }));

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            extra: self.extra.clone(),
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, SolaceError> {
        let wire = self.to_wire(request);
        debug!(
            provider = self.name,
            messages = wire.messages.len(),
            "sending chat completion"
        );

        let response = self.client.complete_chat(&wire).await?;
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            SolaceError::invocation(self.name, "response contained no choices")
        })?;
        let usage = response.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        Ok(ProviderResponse {
            id: response.id,
            content: choice.message.content.unwrap_or_default(),
            model: if response.model.is_empty() {
                self.model.clone().unwrap_or_default()
            } else {
                response.model
            },
            stop_reason: choice.finish_reason,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::ProviderMessage;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ProviderRequest {
        ProviderRequest {
            system_prompt: Some("Be brief.".into()),
            messages: vec![
                ProviderMessage::user("I have an exam"),
                ProviderMessage::assistant("Good luck!"),
                ProviderMessage::user("Any tips?"),
            ],
            max_tokens: 128,
            temperature: Some(0.3),
        }
    }

    #[test]
    fn system_prompt_becomes_first_message() {
        let provider = OpenAiProvider::groq("k", "llama", Duration::from_secs(5)).unwrap();
        let wire = provider.to_wire(request());
        let roles: Vec<&str> = wire.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
        assert_eq!(wire.model.as_deref(), Some("llama"));
        assert!(wire.extra.is_empty());
    }

    #[test]
    fn azure_omits_model_and_targets_deployment() {
        let provider = OpenAiProvider::azure(
            "k",
            "https://example.openai.azure.com/",
            "gpt-4o",
            "2024-06-01",
            Duration::from_secs(5),
        )
        .unwrap();
        assert!(provider.to_wire(request()).model.is_none());
        assert_eq!(
            provider.client().completions_url(),
            "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions"
        );
    }

    #[tokio::test]
    async fn openrouter_sends_reasoning_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "deepseek/deepseek-r1",
                "reasoning": {"enabled": true}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "gen-1",
                "model": "deepseek/deepseek-r1",
                "choices": [{"message": {"role": "assistant", "content": "Breathe slowly."}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 3}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            OpenAiProvider::openrouter("or-key", "deepseek/deepseek-r1", Duration::from_secs(5))
                .unwrap()
                .with_base_url(server.uri());

        let resp = provider.complete(request()).await.unwrap();
        assert_eq!(resp.content, "Breathe slowly.");
        assert_eq!(resp.usage.input_tokens, 12);
        assert_eq!(resp.stop_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn empty_choices_is_an_invocation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"id": "x", "choices": []})),
            )
            .mount(&server)
            .await;

        let provider = OpenAiProvider::groq("k", "llama", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri());

        let err = provider.complete(request()).await.unwrap_err();
        assert!(matches!(err, SolaceError::ModelInvocation { ref provider, .. } if provider == "groq"));
    }
}
