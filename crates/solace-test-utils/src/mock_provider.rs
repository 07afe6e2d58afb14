// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock language model for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted replies and
//! records every request it receives, so tests can assert on prompts
//! without calling a hosted API.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use solace_core::{
    AdapterType, HealthStatus, PluginAdapter, ProviderAdapter, ProviderRequest, ProviderResponse,
    SolaceError, TokenUsage,
};

/// One scripted outcome.
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

/// A mock LLM provider that returns pre-configured responses.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a
/// default "mock response" text is returned.
#[derive(Clone)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        let replies = responses.into_iter().map(|s| Reply::Text(s.into())).collect();
        Self {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.replies.lock().await.push_back(Reply::Text(text.into()));
    }

    /// Queue a failure; the matching call returns `ModelInvocation`.
    pub async fn add_failure(&self, message: impl Into<String>) {
        self.replies.lock().await.push_back(Reply::Fail(message.into()));
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Scripted replies not yet consumed.
    pub async fn pending(&self) -> usize {
        self.replies.lock().await.len()
    }

    async fn next_reply(&self) -> Reply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Reply::Text("mock response".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
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
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, SolaceError> {
        self.requests.lock().await.push(request);
        match self.next_reply().await {
            Reply::Text(content) => Ok(ProviderResponse {
                id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
                content,
                model: "mock-model".to_string(),
                stop_reason: Some("stop".to_string()),
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 20,
                },
            }),
            Reply::Fail(message) => Err(SolaceError::invocation("mock-provider", message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solace_core::ProviderMessage;

    fn request(text: &str) -> ProviderRequest {
        ProviderRequest {
            system_prompt: None,
            messages: vec![ProviderMessage::user(text)],
            max_tokens: 16,
            temperature: None,
        }
    }

    #[tokio::test]
    async fn replies_are_fifo_then_default() {
        let mock = MockProvider::with_responses(["first", "second"]);
        assert_eq!(mock.complete(request("a")).await.unwrap().content, "first");
        assert_eq!(mock.complete(request("b")).await.unwrap().content, "second");
        assert_eq!(mock.complete(request("c")).await.unwrap().content, "mock response");
        assert_eq!(mock.request_count().await, 3);
    }

    #[tokio::test]
    async fn failures_are_injected_in_order() {
        let mock = MockProvider::new();
        mock.add_failure("rate limited").await;
        mock.add_response("ok").await;

        let err = mock.complete(request("a")).await.unwrap_err();
        assert!(matches!(err, SolaceError::ModelInvocation { ref message, .. } if message == "rate limited"));
        assert_eq!(mock.complete(request("b")).await.unwrap().content, "ok");
    }

    #[tokio::test]
    async fn requests_are_captured() {
        let mock = MockProvider::new();
        mock.complete(request("hello")).await.unwrap();
        let captured = mock.requests().await;
        assert_eq!(captured[0].messages[0].content, "hello");
    }
}
