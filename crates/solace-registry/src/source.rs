// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered sources of provider configuration keys.
//!
//! The process environment is consulted first, then the secret store. The
//! first non-empty value wins.

use std::collections::HashMap;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use solace_core::{ProviderConfig, SolaceError};
use tracing::{debug, warn};

/// A flat, string-keyed configuration source.
pub trait ConfigSource: Send + Sync {
    /// Short label for diagnostics (never includes values).
    fn label(&self) -> &str;

    /// Returns the raw value for `key`, if the source has one.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads keys from the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSource;

impl ConfigSource for EnvSource {
    fn label(&self) -> &str {
        "environment"
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Secrets loaded from a flat TOML file of top-level keys.
///
/// Nested tables and arrays are ignored; numbers and booleans are
/// stringified.
pub struct SecretStore {
    label: String,
    values: HashMap<String, SecretString>,
}

impl SecretStore {
    /// Loads the store from `path`. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self, SolaceError> {
        let label = format!("secret store {}", path.display());
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "secret store not found, continuing without it");
                return Ok(Self {
                    label,
                    values: HashMap::new(),
                });
            }
            Err(e) => {
                return Err(SolaceError::Config(format!(
                    "failed to read secret store {}: {e}",
                    path.display()
                )));
            }
        };
        Self::parse(label, &content).map_err(|e| {
            SolaceError::Config(format!("invalid secret store {}: {e}", path.display()))
        })
    }

    /// Parses store content from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, SolaceError> {
        Self::parse("secret store".to_string(), content)
            .map_err(|e| SolaceError::Config(format!("invalid secret store: {e}")))
    }

    fn parse(label: String, content: &str) -> Result<Self, toml::de::Error> {
        let table: toml::Table = content.parse()?;
        let mut values = HashMap::new();
        for (key, value) in table {
            let value = match value {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                other => {
                    warn!(key = %key, kind = other.type_str(), "ignoring non-scalar secret store entry");
                    continue;
                }
            };
            values.insert(key, SecretString::from(value));
        }
        Ok(Self { label, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSource for SecretStore {
    fn label(&self) -> &str {
        &self.label
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).map(|v| v.expose_secret().to_string())
    }
}

/// In-memory source, for embedding callers and tests.
#[derive(Default)]
pub struct StaticSource {
    label: String,
    values: HashMap<String, String>,
}

impl StaticSource {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigSource for StaticSource {
    fn label(&self) -> &str {
        &self.label
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Looks up keys across sources in priority order.
pub struct ConfigResolver {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ConfigResolver {
    pub fn new(sources: Vec<Box<dyn ConfigSource>>) -> Self {
        Self { sources }
    }

    /// Environment first, then the secret store at `secrets_path`.
    pub fn standard(secrets_path: &Path) -> Result<Self, SolaceError> {
        Ok(Self::new(vec![
            Box::new(EnvSource),
            Box::new(SecretStore::load(secrets_path)?),
        ]))
    }

    /// Returns the first non-empty value for `key` and the label of its source.
    pub fn lookup(&self, key: &str) -> Option<(String, &str)> {
        self.sources.iter().find_map(|source| {
            source
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (v, source.label()))
        })
    }

    /// Resolves every key in `keys` or fails on the first missing one.
    pub fn resolve(&self, provider: &str, keys: &[&str]) -> Result<ProviderConfig, SolaceError> {
        let mut config = ProviderConfig::new(provider);
        for key in keys {
            let Some((value, source)) = self.lookup(key) else {
                return Err(SolaceError::ProviderConfig {
                    provider: provider.to_string(),
                    key: (*key).to_string(),
                });
            };
            debug!(provider, key, source, "resolved configuration key");
            config.insert(*key, value);
        }
        Ok(config)
    }

    /// Labels of the configured sources, in priority order.
    pub fn labels(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.label()).collect()
    }
}
