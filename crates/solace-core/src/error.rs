// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Solace pipeline.

use thiserror::Error;

use crate::types::{PipelineStage, ProviderKind};

/// Boxed error source carried by wrapping variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across all Solace crates.
///
/// Construction-time variants (`ProviderConfig`, `UnsupportedProvider`,
/// `ProviderInit`, `IndexLoad`, `IndexIncompatible`) are fatal at startup.
/// `ModelInvocation` and `Pipeline` abort a single request only.
#[derive(Debug, Error)]
pub enum SolaceError {
    /// Configuration errors (invalid TOML, bad values, unreadable secret store).
    #[error("configuration error: {0}")]
    Config(String),

    /// A provider is missing a required configuration key.
    #[error("provider `{provider}` is missing required configuration key `{key}`")]
    ProviderConfig { provider: String, key: String },

    /// The requested provider name is not one of the supported variants.
    #[error("unsupported {kind} provider `{requested}`")]
    UnsupportedProvider {
        kind: ProviderKind,
        requested: String,
    },

    /// The underlying client for a provider could not be constructed.
    #[error("failed to initialize provider `{provider}`: {message}")]
    ProviderInit {
        provider: String,
        message: String,
        source: Option<BoxError>,
    },

    /// The persisted vector index could not be opened or read.
    #[error("failed to load vector index at {path}: {message}")]
    IndexLoad {
        path: String,
        message: String,
        source: Option<BoxError>,
    },

    /// The vector index was built with an embedding model of another dimensionality.
    #[error(
        "vector index at {path} has {actual}-dimensional embeddings, \
         but the embedding model produces {expected}"
    )]
    IndexIncompatible {
        path: String,
        expected: usize,
        actual: usize,
    },

    /// An embedding or generation call failed during a request.
    #[error("model invocation failed ({provider}): {message}")]
    ModelInvocation {
        provider: String,
        message: String,
        source: Option<BoxError>,
    },

    /// The user query was empty after trimming.
    #[error("query must not be empty")]
    EmptyQuery,

    /// A pipeline stage failed; the wrapped error carries the cause.
    #[error("pipeline failed while {stage}: {source}")]
    Pipeline {
        stage: PipelineStage,
        #[source]
        source: Box<SolaceError>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SolaceError {
    /// Wraps a failed model call, tagging it with the provider name.
    pub fn invocation(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelInvocation {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Returns the pipeline stage that failed, if this is a pipeline error.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Pipeline { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// True for errors that make the pipeline unusable until the process is reconfigured.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::ProviderConfig { .. }
                | Self::UnsupportedProvider { .. }
                | Self::ProviderInit { .. }
                | Self::IndexLoad { .. }
                | Self::IndexIncompatible { .. }
        )
    }
}
