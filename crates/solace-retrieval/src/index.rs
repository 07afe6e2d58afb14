// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading the persisted index into memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rusqlite::OpenFlags;
use solace_core::{EmbeddingHandle, SolaceError};
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::retriever::VectorRetriever;
use crate::schema::{self, META_DIMENSIONS, META_EMBEDDING_MODEL};

/// One passage as stored in the index.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPassage {
    pub id: i64,
    pub content: String,
    pub source: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub embedding: Vec<f32>,
}

/// An immutable, fully materialized vector index.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    path: PathBuf,
    dimensions: usize,
    embedding_model: Option<String>,
    passages: Vec<StoredPassage>,
}

/// Raw passage row before metadata and vector decoding.
struct RawRow {
    id: i64,
    content: String,
    source: Option<String>,
    metadata: Option<String>,
    embedding: Vec<u8>,
}

impl VectorIndex {
    /// Opens the index at `path` and checks it against `embedder`.
    ///
    /// Fails with `IndexLoad` if the file is missing or unreadable, and
    /// with `IndexIncompatible` if its dimensionality differs from the
    /// embedder's.
    pub async fn load(
        path: impl AsRef<Path>,
        embedder: EmbeddingHandle,
    ) -> Result<VectorRetriever, SolaceError> {
        let index = Self::open(path).await?;
        let expected = embedder.dimensions();
        if index.dimensions != expected {
            return Err(SolaceError::IndexIncompatible {
                path: index.path.display().to_string(),
                expected,
                actual: index.dimensions,
            });
        }
        Ok(VectorRetriever::new(index, embedder))
    }

    /// Reads the whole index without checking it against an embedder.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SolaceError> {
        let path = path.as_ref().to_path_buf();
        let shown = path.display().to_string();

        if !path.is_file() {
            return Err(load_error(&shown, "file not found", None));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .await
        .map_err(|e| load_error(&shown, "failed to open database", Some(Box::new(e))))?;

        let (meta, rows) = conn
            .call(|conn| -> Result<(HashMap<String, String>, Vec<RawRow>), rusqlite::Error> {
                let mut stmt = conn.prepare("SELECT key, value FROM index_meta")?;
                let meta = stmt
                    .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
                    .collect::<Result<HashMap<_, _>, _>>()?;

                let mut stmt = conn.prepare(
                    "SELECT id, content, source, metadata, embedding FROM passages ORDER BY id",
                )?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok(RawRow {
                            id: row.get(0)?,
                            content: row.get(1)?,
                            source: row.get(2)?,
                            metadata: row.get(3)?,
                            embedding: row.get(4)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((meta, rows))
            })
            .await
            .map_err(|e| load_error(&shown, "failed to read index tables", Some(Box::new(e))))?;

        drop(conn);
        debug!(path = %shown, rows = rows.len(), "index tables read");

        let dimensions = meta
            .get(META_DIMENSIONS)
            .ok_or_else(|| load_error(&shown, "index_meta has no `dimensions` entry", None))?
            .trim()
            .parse::<usize>()
            .map_err(|e| load_error(&shown, &format!("invalid `dimensions` value: {e}"), None))?;
        let embedding_model = meta.get(META_EMBEDDING_MODEL).cloned();

        let passages = rows
            .into_iter()
            .map(|row| decode_row(&shown, dimensions, row))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            path = %shown,
            passages = passages.len(),
            dimensions,
            embedding_model = embedding_model.as_deref().unwrap_or("unknown"),
            "vector index loaded"
        );

        Ok(Self {
            path,
            dimensions,
            embedding_model,
            passages,
        })
    }

    /// Builds an index from already-decoded passages.
    pub fn from_parts(
        path: impl Into<PathBuf>,
        dimensions: usize,
        embedding_model: Option<String>,
        passages: Vec<StoredPassage>,
    ) -> Self {
        Self {
            path: path.into(),
            dimensions,
            embedding_model,
            passages,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Model name recorded when the index was built, if any.
    pub fn embedding_model(&self) -> Option<&str> {
        self.embedding_model.as_deref()
    }

    /// Passages in ascending `id` order.
    pub fn passages(&self) -> &[StoredPassage] {
        &self.passages
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

fn decode_row(path: &str, dimensions: usize, row: RawRow) -> Result<StoredPassage, SolaceError> {
    let embedding = schema::blob_to_vec(&row.embedding).ok_or_else(|| {
        load_error(
            path,
            &format!("passage {} has a truncated embedding blob", row.id),
            None,
        )
    })?;
    if embedding.len() != dimensions {
        return Err(SolaceError::IndexIncompatible {
            path: path.to_string(),
            expected: dimensions,
            actual: embedding.len(),
        });
    }
    if embedding.iter().any(|x| !x.is_finite()) {
        return Err(load_error(
            path,
            &format!("passage {} has a non-finite embedding component", row.id),
            None,
        ));
    }

    let metadata = match row.metadata.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(serde_json::from_str(raw).map_err(|e| {
            load_error(
                path,
                &format!("passage {} has invalid metadata JSON", row.id),
                Some(Box::new(e)),
            )
        })?),
    };

    Ok(StoredPassage {
        id: row.id,
        content: row.content,
        source: row.source,
        metadata,
        embedding,
    })
}

fn load_error(path: &str, message: &str, source: Option<solace_core::BoxError>) -> SolaceError {
    SolaceError::IndexLoad {
        path: path.to_string(),
        message: message.to_string(),
        source,
    }
}
