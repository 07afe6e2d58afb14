// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writes small vector index files for tests.

use std::path::Path;

use rusqlite::{Connection, params};
use solace_core::EmbeddingAdapter;
use solace_retrieval::schema::{self, META_DIMENSIONS, META_EMBEDDING_MODEL};

use crate::mock_embedder::MockEmbedder;

/// A passage to store in a fixture index.
#[derive(Debug, Clone, Default)]
pub struct FixturePassage {
    pub content: String,
    pub source: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl FixturePassage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl From<&str> for FixturePassage {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for FixturePassage {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

/// Writes an index at `path`, embedding each passage with `embedder`.
///
/// Passage ids follow slice order starting at 1.
pub fn write_index(
    path: &Path,
    embedder: &MockEmbedder,
    passages: &[FixturePassage],
) -> rusqlite::Result<()> {
    let rows: Vec<(FixturePassage, Vec<f32>)> = passages
        .iter()
        .map(|p| (p.clone(), embedder.vector_for(&p.content)))
        .collect();
    write_raw_index(path, embedder.dimensions(), Some("mock-embedder"), &rows)
}

/// Writes an index with caller-supplied vectors and a declared dimensionality.
///
/// Vectors are stored as given, so mismatched lengths can be used to test
/// load failures.
pub fn write_raw_index(
    path: &Path,
    dimensions: usize,
    embedding_model: Option<&str>,
    rows: &[(FixturePassage, Vec<f32>)],
) -> rusqlite::Result<()> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(schema::CREATE_SCHEMA)?;

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT OR REPLACE INTO index_meta (key, value) VALUES (?1, ?2)",
        params![META_DIMENSIONS, dimensions.to_string()],
    )?;
    if let Some(model) = embedding_model {
        tx.execute(
            "INSERT OR REPLACE INTO index_meta (key, value) VALUES (?1, ?2)",
            params![META_EMBEDDING_MODEL, model],
        )?;
    }
    for (i, (passage, vector)) in rows.iter().enumerate() {
        tx.execute(
            "INSERT INTO passages (id, content, source, metadata, embedding) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                (i + 1) as i64,
                passage.content,
                passage.source,
                passage.metadata.as_ref().map(|m| m.to_string()),
                schema::vec_to_blob(vector),
            ],
        )?;
    }
    tx.commit()
}
