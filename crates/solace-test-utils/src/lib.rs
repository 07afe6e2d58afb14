// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Solace integration tests.
//!
//! Provides mock models, index fixtures and a pipeline harness for fast,
//! deterministic, CI-runnable tests without hosted APIs or model downloads.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock LLM with scripted replies and request capture
//! - [`MockEmbedder`] - Deterministic bag-of-words embedder
//! - [`write_index`] - Fixture index writer
//! - [`TestHarness`] - Full pipeline over the mocks

pub mod fixture;
pub mod harness;
pub mod mock_embedder;
pub mod mock_provider;

pub use fixture::{FixturePassage, write_index, write_raw_index};
pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_embedder::MockEmbedder;
pub use mock_provider::MockProvider;
