// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible Chat Completions endpoints.
//!
//! One client type serves Azure OpenAI, Groq and OpenRouter; they differ
//! only in base URL, auth header and a few query/body fields.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use solace_core::SolaceError;
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// How the API key is presented to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>` (Groq, OpenRouter).
    Bearer,
    /// `api-key: <key>` (Azure OpenAI).
    ApiKeyHeader,
}

/// HTTP client for one OpenAI-compatible deployment.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    provider: &'static str,
    base_url: String,
    query: Vec<(String, String)>,
}

impl OpenAiClient {
    /// Creates a client with auth headers baked into the connection pool.
    ///
    /// # Arguments
    /// * `provider` - Registry name used in error messages
    /// * `base_url` - URL that `/chat/completions` is appended to
    /// * `api_key` - Credential sent on every request
    /// * `auth` - Header style for the credential
    /// * `timeout` - Whole-request timeout
    pub fn new(
        provider: &'static str,
        base_url: impl Into<String>,
        api_key: &str,
        auth: AuthStyle,
        timeout: Duration,
    ) -> Result<Self, SolaceError> {
        let init_err = |message: String| SolaceError::ProviderInit {
            provider: provider.to_string(),
            message,
            source: None,
        };

        let mut headers = HeaderMap::new();
        let (name, value) = match auth {
            AuthStyle::Bearer => (
                reqwest::header::AUTHORIZATION,
                format!("Bearer {api_key}"),
            ),
            AuthStyle::ApiKeyHeader => (HeaderName::from_static("api-key"), api_key.to_string()),
        };
        let mut value = HeaderValue::from_str(&value)
            .map_err(|e| init_err(format!("invalid API key header value: {e}")))?;
        value.set_sensitive(true);
        headers.insert(name, value);
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| SolaceError::ProviderInit {
                provider: provider.to_string(),
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            provider,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            query: Vec::new(),
        })
    }

    /// Adds a query parameter sent with every request (Azure `api-version`).
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Overrides the base URL (self-hosted gateways, wiremock in tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Sends a non-streaming completion request.
    ///
    /// Failures are returned as-is; retrying is left to the caller.
    pub async fn complete_chat(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, SolaceError> {
        let response = self
            .client
            .post(self.completions_url())
            .query(&self.query)
            .json(request)
            .send()
            .await
            .map_err(|e| self.error(format!("HTTP request failed: {e}"), Some(Box::new(e))))?;

        let status = response.status();
        debug!(provider = self.provider, status = %status, "completion response received");

        let body = response
            .text()
            .await
            .map_err(|e| self.error(format!("failed to read response body: {e}"), Some(Box::new(e))))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => match api_err.error.type_ {
                    Some(kind) => format!("API error {status} ({kind}): {}", api_err.error.message),
                    None => format!("API error {status}: {}", api_err.error.message),
                },
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(self.error(message, None));
        }

        serde_json::from_str(&body)
            .map_err(|e| self.error(format!("failed to parse API response: {e}"), Some(Box::new(e))))
    }

    fn error(&self, message: String, source: Option<solace_core::BoxError>) -> SolaceError {
        SolaceError::ModelInvocation {
            provider: self.provider.to_string(),
            message,
            source,
        }
    }
}
