// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Closed sets of supported providers and the keys each one requires.

use std::str::FromStr;

use solace_core::{ProviderKind, SolaceError};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Supported embedding backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmbeddingProvider {
    HuggingFace,
}

impl EmbeddingProvider {
    /// Keys that must resolve before the backend is constructed, in lookup order.
    pub fn required_keys(self) -> &'static [&'static str] {
        match self {
            Self::HuggingFace => &["EMBEDDING_MODEL_NAME"],
        }
    }

    /// Parses a user-supplied name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Result<Self, SolaceError> {
        Self::from_str(name.trim()).map_err(|_| SolaceError::UnsupportedProvider {
            kind: ProviderKind::Embedding,
            requested: name.to_string(),
        })
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Supported language model backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LanguageProvider {
    Azure,
    Groq,
    Gemini,
    OpenRouter,
}

impl LanguageProvider {
    pub fn required_keys(self) -> &'static [&'static str] {
        match self {
            Self::Azure => &[
                "AZURE_OAI_KEY",
                "AZURE_OPENAI_ENDPOINT",
                "AZURE_OPENAI_DEPLOYMENT",
                "AZURE_OPENAI_API_VERSION",
            ],
            Self::Groq => &["GROQ_API_KEY", "GROQ_MODEL_NAME"],
            Self::Gemini => &["GEMINI_API_KEY", "GEMINI_MODEL_NAME"],
            Self::OpenRouter => &["OPENROUTER_API_KEY", "OPENROUTER_MODEL_NAME"],
        }
    }

    pub fn parse(name: &str) -> Result<Self, SolaceError> {
        Self::from_str(name.trim()).map_err(|_| SolaceError::UnsupportedProvider {
            kind: ProviderKind::Language,
            requested: name.to_string(),
        })
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}
