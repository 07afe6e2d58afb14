// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait shared by embedding and language model adapters.

use async_trait::async_trait;

use crate::error::SolaceError;
use crate::types::{AdapterType, HealthStatus};

/// The base trait for all Solace model adapters.
///
/// Provides identity and health check capabilities. Adapters are shared
/// across concurrent requests and must not hold per-request mutable state.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the registry name of the provider backing this adapter.
    fn name(&self) -> &str;

    /// Returns the semantic version of this adapter.
    fn version(&self) -> semver::Version;

    /// Returns the kind of capability this adapter provides.
    fn adapter_type(&self) -> AdapterType;

    /// Performs a cheap local health check.
    async fn health_check(&self) -> Result<HealthStatus, SolaceError>;
}
