// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini language model adapter.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use solace_core::{
    AdapterType, HealthStatus, PluginAdapter, ProviderAdapter, ProviderRequest, ProviderResponse,
    Role, SolaceError, TokenUsage,
};

pub use client::GeminiClient;
use types::{Content, GenerateContentRequest, GenerationConfig};

/// Language model adapter for Gemini.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self, SolaceError> {
        Ok(Self {
            client: GeminiClient::new(api_key.to_string(), model.to_string(), timeout)?,
        })
    }

    /// Overrides the API root (wiremock in tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }
}

/// Converts a provider-neutral request into Gemini's shape.
///
/// Gemini names the assistant role `model` and takes the system prompt as
/// a separate `systemInstruction`.
fn to_wire(request: ProviderRequest) -> GenerateContentRequest {
    let contents = request
        .messages
        .into_iter()
        .map(|m| {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "model",
            };
            Content::text(Some(role), m.content)
        })
        .collect();

    GenerateContentRequest {
        system_instruction: request.system_prompt.map(|s| Content::text(None, s)),
        contents,
        generation_config: GenerationConfig {
            max_output_tokens: request.max_tokens,
            temperature: request.temperature,
        },
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
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
impl ProviderAdapter for GeminiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, SolaceError> {
        let response = self.client.generate(&to_wire(request)).await?;

        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| SolaceError::invocation("gemini", "response contained no candidates"))?;

        let usage = response
            .usage_metadata
            .map_or_else(TokenUsage::default, |u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            });

        Ok(ProviderResponse {
            id: response.response_id.clone().unwrap_or_default(),
            content: candidate.text(),
            model: response
                .model_version
                .clone()
                .unwrap_or_else(|| self.client.model().to_string()),
            stop_reason: candidate.finish_reason.clone(),
            usage,
        })
    }
}
