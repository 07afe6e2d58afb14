// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider registry for Solace.
//!
//! Turns a provider name plus configuration (environment, then secret
//! store) into an embedding or language model handle. Every required key is
//! checked before a client is built.

pub mod provider;
pub mod registry;
pub mod source;

pub use provider::{EmbeddingProvider, LanguageProvider};
pub use registry::{KeyStatus, ProviderRegistry, ProviderStatus, RegistryOptions};
pub use source::{ConfigResolver, ConfigSource, EnvSource, SecretStore, StaticSource};
