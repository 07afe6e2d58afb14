// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles a complete pipeline with a mock language model,
//! the bag-of-words embedder and a temp index file written from the given
//! passages. `ask()` drives one full conversational turn.

use std::path::PathBuf;
use std::sync::Arc;

use solace_core::{ConversationHistory, SolaceError};
use solace_pipeline::{ConversationPipeline, PipelineOptions, PipelineResponse};
use solace_retrieval::{VectorIndex, VectorRetriever};

use crate::fixture::{FixturePassage, write_index};
use crate::mock_embedder::MockEmbedder;
use crate::mock_provider::MockProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    passages: Vec<FixturePassage>,
    dimensions: usize,
    options: PipelineOptions,
    write_index: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            passages: Vec::new(),
            dimensions: 64,
            options: PipelineOptions::default(),
            write_index: true,
        }
    }

    /// Set mock provider responses, consumed in call order.
    pub fn with_mock_responses<S: Into<String>>(mut self, responses: impl IntoIterator<Item = S>) -> Self {
        self.responses = responses.into_iter().map(Into::into).collect();
        self
    }

    /// Passages written to the temp index.
    pub fn with_passages<P: Into<FixturePassage>>(mut self, passages: impl IntoIterator<Item = P>) -> Self {
        self.passages = passages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.options.top_k = top_k;
        self
    }

    pub fn with_fallback_answer(mut self, answer: impl Into<String>) -> Self {
        self.options.fallback_answer = answer.into();
        self
    }

    /// Build with an unloaded retriever instead of an index file.
    pub fn without_index(mut self) -> Self {
        self.write_index = false;
        self
    }

    /// Build the test harness, creating the temp index and pipeline.
    pub async fn build(self) -> Result<TestHarness, SolaceError> {
        let temp_dir = tempfile::TempDir::new()
            .map_err(|e| SolaceError::Internal(format!("failed to create temp dir: {e}")))?;

        let embedder = Arc::new(MockEmbedder::new(self.dimensions));
        let mock_provider = Arc::new(MockProvider::with_responses(self.responses));

        let (retriever, index_path) = if self.write_index {
            let path = temp_dir.path().join("index.db");
            write_index(&path, &embedder, &self.passages)
                .map_err(|e| SolaceError::Internal(format!("failed to write fixture index: {e}")))?;
            let retriever = VectorIndex::load(&path, embedder.clone()).await?;
            (retriever, Some(path))
        } else {
            (VectorRetriever::unloaded(embedder.clone()), None)
        };

        let pipeline = ConversationPipeline::new(mock_provider.clone(), retriever, self.options);

        Ok(TestHarness {
            pipeline,
            mock_provider,
            embedder,
            index_path,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete pipeline over mock models and a temp index.
pub struct TestHarness {
    pub pipeline: ConversationPipeline,
    /// The mock LLM provider, shared with the pipeline.
    pub mock_provider: Arc<MockProvider>,
    pub embedder: Arc<MockEmbedder>,
    /// Index file path, `None` when built `without_index`.
    pub index_path: Option<PathBuf>,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Runs one conversational turn through the pipeline.
    pub async fn ask(
        &self,
        query: &str,
        history: &ConversationHistory,
    ) -> Result<PipelineResponse, SolaceError> {
        self.pipeline.invoke(query, history).await
    }
}
