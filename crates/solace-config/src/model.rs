// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Solace.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.
//!
//! Provider credentials are deliberately absent here: they are resolved by
//! the provider registry from the environment and the secret store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Solace configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SolaceConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Embedding model selection.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Language model selection and generation limits.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Persisted vector index settings.
    #[serde(default)]
    pub index: IndexConfig,

    /// Secondary secret store settings.
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Conversation pipeline behavior.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in the shell banner.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "solace".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Embedding model configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Embedding provider name (case-insensitive).
    #[serde(default = "default_embedding_provider")]
    pub provider: String,

    /// Directory for downloaded model files. Defaults to the platform data dir.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            cache_dir: None,
        }
    }
}

impl EmbeddingConfig {
    /// Returns the configured cache directory or `<data_dir>/solace`.
    pub fn resolved_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("solace")
        })
    }
}

fn default_embedding_provider() -> String {
    "huggingface".to_string()
}

/// Language model configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// Language provider name (case-insensitive).
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// Maximum tokens for a generated answer.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature. `None` uses the provider default.
    #[serde(default)]
    pub temperature: Option<f32>,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            max_tokens: default_max_tokens(),
            temperature: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_llm_provider() -> String {
    "gemini".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_timeout_secs() -> u64 {
    120
}

/// Vector index configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Path to the persisted index database.
    #[serde(default = "default_index_path")]
    pub path: PathBuf,

    /// Number of passages retrieved per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            top_k: default_top_k(),
        }
    }
}

fn default_index_path() -> PathBuf {
    PathBuf::from("vectorstore/index.db")
}

fn default_top_k() -> usize {
    4
}

/// Secret store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecretsConfig {
    /// Flat TOML file consulted after the process environment.
    /// A missing file is treated as an empty store.
    #[serde(default = "default_secrets_path")]
    pub path: PathBuf,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            path: default_secrets_path(),
        }
    }
}

fn default_secrets_path() -> PathBuf {
    PathBuf::from("secrets.toml")
}

/// Conversation pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Answer returned when retrieval finds nothing to ground on.
    #[serde(default = "default_fallback_answer")]
    pub fallback_answer: String,

    /// Token cap for the query rewrite call.
    #[serde(default = "default_contextualize_max_tokens")]
    pub contextualize_max_tokens: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fallback_answer: default_fallback_answer(),
            contextualize_max_tokens: default_contextualize_max_tokens(),
        }
    }
}

/// Default answer when no passage supports a response.
pub const DEFAULT_FALLBACK_ANSWER: &str =
    "I don't know. I couldn't find anything about that in the material I have.";

fn default_fallback_answer() -> String {
    DEFAULT_FALLBACK_ANSWER.to_string()
}

fn default_contextualize_max_tokens() -> u32 {
    256
}
