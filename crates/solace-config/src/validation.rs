// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as non-empty paths, positive limits, and known log levels.

use crate::diagnostic::ConfigError;
use crate::model::SolaceConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SolaceConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.app.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "app.log_level `{}` is not one of {}",
                config.app.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.embedding.provider.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "embedding.provider must not be empty".to_string(),
        });
    }

    if config.llm.provider.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "llm.provider must not be empty".to_string(),
        });
    }

    if config.llm.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "llm.max_tokens must be at least 1".to_string(),
        });
    }

    if let Some(temperature) = config.llm.temperature
        && !(0.0..=2.0).contains(&temperature)
    {
        errors.push(ConfigError::Validation {
            message: format!("llm.temperature must be between 0.0 and 2.0, got {temperature}"),
        });
    }

    if config.llm.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "llm.timeout_secs must be at least 1".to_string(),
        });
    }

    if config.index.path.as_os_str().is_empty() {
        errors.push(ConfigError::Validation {
            message: "index.path must not be empty".to_string(),
        });
    }

    if config.index.top_k == 0 {
        errors.push(ConfigError::Validation {
            message: "index.top_k must be at least 1".to_string(),
        });
    }

    if config.secrets.path.as_os_str().is_empty() {
        errors.push(ConfigError::Validation {
            message: "secrets.path must not be empty".to_string(),
        });
    }

    if config.pipeline.fallback_answer.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "pipeline.fallback_answer must not be empty".to_string(),
        });
    }

    if config.pipeline.contextualize_max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "pipeline.contextualize_max_tokens must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
