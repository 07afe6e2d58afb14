// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps provider names to ready-to-use model handles.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use solace_config::SolaceConfig;
use solace_core::{EmbeddingHandle, LanguageHandle, ProviderConfig, SolaceError};
use solace_gemini::GeminiProvider;
use solace_openai::OpenAiProvider;
use strum::IntoEnumIterator;
use tracing::info;

use crate::provider::{EmbeddingProvider, LanguageProvider};
use crate::source::ConfigResolver;

/// Construction options that do not come from the key lookup.
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Where downloaded embedding models are cached.
    pub embedding_cache_dir: PathBuf,
    /// Transport timeout for hosted model clients.
    pub request_timeout: Duration,
}

impl RegistryOptions {
    pub fn from_config(config: &SolaceConfig) -> Self {
        Self {
            embedding_cache_dir: config.embedding.resolved_cache_dir(),
            request_timeout: Duration::from_secs(config.llm.timeout_secs),
        }
    }
}

/// One required key and whether it currently resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStatus {
    pub key: &'static str,
    /// Label of the source that supplied it, if any.
    pub source: Option<String>,
}

/// A supported provider and the state of its keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderStatus {
    pub name: &'static str,
    pub keys: Vec<KeyStatus>,
}

impl ProviderStatus {
    pub fn is_configured(&self) -> bool {
        self.keys.iter().all(|k| k.source.is_some())
    }
}

/// Resolves provider names to embedding and language model handles.
///
/// Handles are built fresh on each call; callers resolve once at startup
/// and share the returned `Arc`.
pub struct ProviderRegistry {
    resolver: ConfigResolver,
    options: RegistryOptions,
}

impl ProviderRegistry {
    pub fn new(resolver: ConfigResolver, options: RegistryOptions) -> Self {
        Self { resolver, options }
    }

    /// Standard lookup chain (environment, then the configured secret store).
    pub fn from_config(config: &SolaceConfig) -> Result<Self, SolaceError> {
        let resolver = ConfigResolver::standard(&config.secrets.path)?;
        Ok(Self::new(resolver, RegistryOptions::from_config(config)))
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// Resolves every required key for the named provider.
    ///
    /// The name is tried as a language provider first, then as an
    /// embedding provider.
    pub fn resolve_config(&self, name: &str) -> Result<ProviderConfig, SolaceError> {
        if let Ok(provider) = LanguageProvider::parse(name) {
            return self
                .resolver
                .resolve(provider.as_str(), provider.required_keys());
        }
        let provider = EmbeddingProvider::parse(name)?;
        self.resolver
            .resolve(provider.as_str(), provider.required_keys())
    }

    /// Builds the named embedding backend, downloading model files on first use.
    pub async fn resolve_embedding_provider(
        &self,
        name: &str,
    ) -> Result<EmbeddingHandle, SolaceError> {
        let provider = EmbeddingProvider::parse(name)?;
        let config = self
            .resolver
            .resolve(provider.as_str(), provider.required_keys())?;

        let handle: EmbeddingHandle = match provider {
            EmbeddingProvider::HuggingFace => {
                let model = config.require("EMBEDDING_MODEL_NAME")?;
                let embedder = solace_embedding::load_local_embedder(
                    self.options.embedding_cache_dir.clone(),
                    model,
                )
                .await?;
                Arc::new(embedder)
            }
        };
        info!(provider = %provider, dimensions = handle.dimensions(), "embedding provider ready");
        Ok(handle)
    }

    /// Builds the named language model client.
    pub fn resolve_language_provider(&self, name: &str) -> Result<LanguageHandle, SolaceError> {
        let provider = LanguageProvider::parse(name)?;
        let config = self
            .resolver
            .resolve(provider.as_str(), provider.required_keys())?;
        let handle = build_language(provider, &config, self.options.request_timeout)?;
        info!(provider = %provider, "language provider ready");
        Ok(handle)
    }

    pub fn supported_embedding_providers(&self) -> Vec<ProviderStatus> {
        EmbeddingProvider::iter()
            .map(|p| self.status(p.as_str(), p.required_keys()))
            .collect()
    }

    pub fn supported_language_providers(&self) -> Vec<ProviderStatus> {
        LanguageProvider::iter()
            .map(|p| self.status(p.as_str(), p.required_keys()))
            .collect()
    }

    fn status(&self, name: &'static str, keys: &'static [&'static str]) -> ProviderStatus {
        ProviderStatus {
            name,
            keys: keys
                .iter()
                .map(|key| KeyStatus {
                    key,
                    source: self.resolver.lookup(key).map(|(_, label)| label.to_string()),
                })
                .collect(),
        }
    }
}

fn build_language(
    provider: LanguageProvider,
    config: &ProviderConfig,
    timeout: Duration,
) -> Result<LanguageHandle, SolaceError> {
    let handle: LanguageHandle = match provider {
        LanguageProvider::Azure => Arc::new(OpenAiProvider::azure(
            config.require("AZURE_OAI_KEY")?,
            config.require("AZURE_OPENAI_ENDPOINT")?,
            config.require("AZURE_OPENAI_DEPLOYMENT")?,
            config.require("AZURE_OPENAI_API_VERSION")?,
            timeout,
        )?),
        LanguageProvider::Groq => Arc::new(OpenAiProvider::groq(
            config.require("GROQ_API_KEY")?,
            config.require("GROQ_MODEL_NAME")?,
            timeout,
        )?),
        LanguageProvider::Gemini => Arc::new(GeminiProvider::new(
            config.require("GEMINI_API_KEY")?,
            config.require("GEMINI_MODEL_NAME")?,
            timeout,
        )?),
        LanguageProvider::OpenRouter => Arc::new(OpenAiProvider::openrouter(
            config.require("OPENROUTER_API_KEY")?,
            config.require("OPENROUTER_MODEL_NAME")?,
            timeout,
        )?),
    };
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;

    fn registry(source: StaticSource) -> ProviderRegistry {
        ProviderRegistry::new(
            ConfigResolver::new(vec![Box::new(source)]),
            RegistryOptions {
                embedding_cache_dir: PathBuf::from("/nonexistent/cache"),
                request_timeout: Duration::from_secs(5),
            },
        )
    }

    #[test]
    fn language_provider_builds_with_all_keys() {
        let reg = registry(
            StaticSource::new("test")
                .with("GROQ_API_KEY", "gsk-test")
                .with("GROQ_MODEL_NAME", "llama-3.1-8b-instant"),
        );
        let handle = reg.resolve_language_provider("Groq").unwrap();
        assert_eq!(handle.name(), "groq");
    }

    #[test]
    fn missing_key_names_the_first_gap() {
        let reg = registry(
            StaticSource::new("test")
                .with("AZURE_OAI_KEY", "k")
                .with("AZURE_OPENAI_DEPLOYMENT", "gpt-4o"),
        );
        let err = reg.resolve_language_provider("azure").err().expect("should fail");
        assert!(matches!(
            err,
            SolaceError::ProviderConfig { ref provider, ref key }
                if provider == "azure" && key == "AZURE_OPENAI_ENDPOINT"
        ));
    }

    #[test]
    fn unknown_language_provider_is_rejected() {
        let reg = registry(StaticSource::new("test"));
        let err = reg.resolve_language_provider("anthropic").err().expect("should fail");
        assert!(matches!(err, SolaceError::UnsupportedProvider { .. }));
    }

    #[tokio::test]
    async fn embedding_provider_checks_keys_before_download() {
        let reg = registry(StaticSource::new("test"));
        let err = reg
            .resolve_embedding_provider("huggingface")
            .await
            .err()
            .expect("should fail");
        assert!(matches!(
            err,
            SolaceError::ProviderConfig { ref key, .. } if key == "EMBEDDING_MODEL_NAME"
        ));
    }

    #[test]
    fn resolve_config_covers_both_kinds() {
        let reg = registry(
            StaticSource::new("test")
                .with("EMBEDDING_MODEL_NAME", "sentence-transformers/all-MiniLM-L6-v2")
                .with("GEMINI_API_KEY", "g")
                .with("GEMINI_MODEL_NAME", "gemini-2.0-flash"),
        );
        let cfg = reg.resolve_config("HUGGINGFACE").unwrap();
        assert_eq!(cfg.provider(), "huggingface");
        let cfg = reg.resolve_config("gemini").unwrap();
        assert_eq!(cfg.get("GEMINI_MODEL_NAME"), Some("gemini-2.0-flash"));
        assert!(matches!(
            reg.resolve_config("nope"),
            Err(SolaceError::UnsupportedProvider { .. })
        ));
    }

    #[test]
    fn status_reports_sources_without_values() {
        let reg = registry(StaticSource::new("test").with("GROQ_API_KEY", "secret"));
        let groq = reg
            .supported_language_providers()
            .into_iter()
            .find(|p| p.name == "groq")
            .unwrap();
        assert!(!groq.is_configured());
        assert_eq!(groq.keys[0].source.as_deref(), Some("test"));
        assert_eq!(groq.keys[1].source, None);
        assert_eq!(reg.supported_language_providers().len(), 4);
        assert_eq!(reg.supported_embedding_providers().len(), 1);
    }
}
