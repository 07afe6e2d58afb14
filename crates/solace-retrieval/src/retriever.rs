// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Similarity search over a loaded [`VectorIndex`].

use std::sync::Arc;

use solace_core::{EmbeddingHandle, EmbeddingInput, RetrievedPassage, SolaceError};
use tracing::debug;

use crate::index::VectorIndex;
use crate::schema::cosine_similarity;

/// Returns the passages most similar to a query.
///
/// Cloning is cheap; the index and embedder are shared behind `Arc`.
#[derive(Clone)]
pub struct VectorRetriever {
    index: Option<Arc<VectorIndex>>,
    embedder: EmbeddingHandle,
}

impl VectorRetriever {
    pub(crate) fn new(index: VectorIndex, embedder: EmbeddingHandle) -> Self {
        Self {
            index: Some(Arc::new(index)),
            embedder,
        }
    }

    /// A retriever with no index. Every query returns nothing.
    pub fn unloaded(embedder: EmbeddingHandle) -> Self {
        Self {
            index: None,
            embedder,
        }
    }

    pub fn index(&self) -> Option<&VectorIndex> {
        self.index.as_deref()
    }

    pub fn len(&self) -> usize {
        self.index.as_ref().map_or(0, |i| i.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensionality of the index, or of the embedder when unloaded.
    pub fn dimensions(&self) -> usize {
        self.index
            .as_ref()
            .map_or_else(|| self.embedder.dimensions(), |i| i.dimensions())
    }

    /// Returns up to `k` passages in descending similarity to `query`.
    ///
    /// Equal scores keep index order. An empty index or `k == 0` returns
    /// nothing without embedding the query.
    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedPassage>, SolaceError> {
        let Some(index) = self.index.as_deref().filter(|i| !i.is_empty()) else {
            debug!("no index loaded, skipping retrieval");
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }

        let output = self.embedder.embed(EmbeddingInput::single(query)).await?;
        let query_vec = output.embeddings.into_iter().next().ok_or_else(|| {
            SolaceError::invocation(self.embedder.name(), "embedding returned no vectors")
        })?;
        if query_vec.len() != index.dimensions() {
            return Err(SolaceError::invocation(
                self.embedder.name(),
                format!(
                    "query embedding has {} dimensions, index has {}",
                    query_vec.len(),
                    index.dimensions()
                ),
            ));
        }

        let mut scored: Vec<(usize, f32)> = index
            .passages()
            .iter()
            .enumerate()
            .map(|(i, p)| (i, rank_score(cosine_similarity(&query_vec, &p.embedding))))
            .collect();
        // sort_by is stable, so ties stay in id order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        let passages: Vec<RetrievedPassage> = scored
            .into_iter()
            .map(|(i, score)| {
                let p = &index.passages()[i];
                RetrievedPassage {
                    content: p.content.clone(),
                    score,
                    source: p.source.clone(),
                    metadata: p.metadata.clone(),
                }
            })
            .collect();

        debug!(
            k,
            returned = passages.len(),
            top_score = passages.first().map(|p| p.score),
            "retrieval complete"
        );
        Ok(passages)
    }
}

/// NaN sorts below every real score.
fn rank_score(score: f32) -> f32 {
    if score.is_nan() { f32::NEG_INFINITY } else { score }
}
