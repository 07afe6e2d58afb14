// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for hosted language models (Azure, Groq, Gemini, OpenRouter).

use async_trait::async_trait;

use crate::error::SolaceError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for language model providers.
///
/// Every provider exposes the same single-shot completion shape, so the
/// pipeline never branches on which backend it is talking to.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    ///
    /// Failures are reported as [`SolaceError::ModelInvocation`] tagged
    /// with the provider name.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, SolaceError>;
}
