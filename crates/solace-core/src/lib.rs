// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Solace.
//!
//! This crate provides the model capability traits, the error taxonomy and
//! the conversation types used throughout the Solace workspace.

use std::sync::Arc;

pub mod error;
pub mod traits;
pub mod types;

pub use error::{BoxError, SolaceError};
pub use types::{
    AdapterType, ConversationHistory, ConversationTurn, EmbeddingInput, EmbeddingOutput,
    HealthStatus, PipelineStage, ProviderConfig, ProviderKind, ProviderMessage, ProviderRequest,
    ProviderResponse, RetrievedPassage, Role, Speaker, TokenUsage,
};

pub use traits::{EmbeddingAdapter, PluginAdapter, ProviderAdapter};

/// Shared handle to an embedding model.
pub type EmbeddingHandle = Arc<dyn EmbeddingAdapter>;

/// Shared handle to a language model.
pub type LanguageHandle = Arc<dyn ProviderAdapter>;
