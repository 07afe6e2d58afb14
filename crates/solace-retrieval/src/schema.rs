// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk layout of the vector index and the vector helpers used to read it.
//!
//! ```sql
//! CREATE TABLE index_meta (key TEXT PRIMARY KEY NOT NULL, value TEXT NOT NULL);
//! CREATE TABLE passages (
//!     id        INTEGER PRIMARY KEY,
//!     content   TEXT NOT NULL,
//!     source    TEXT,
//!     metadata  TEXT,          -- JSON object, optional
//!     embedding BLOB NOT NULL  -- little-endian f32
//! );
//! ```

/// Key/value metadata table.
pub const META_TABLE: &str = "index_meta";

/// Passage table, read in `id` order.
pub const PASSAGES_TABLE: &str = "passages";

/// `index_meta` key holding the embedding dimensionality.
pub const META_DIMENSIONS: &str = "dimensions";

/// `index_meta` key holding the embedding model name the index was built with.
pub const META_EMBEDDING_MODEL: &str = "embedding_model";

/// DDL for a fresh index. Used by fixture writers.
pub const CREATE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS index_meta (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS passages (
    id        INTEGER PRIMARY KEY,
    content   TEXT NOT NULL,
    source    TEXT,
    metadata  TEXT,
    embedding BLOB NOT NULL
);
";

/// Convert an f32 vector to a SQLite BLOB (little-endian bytes).
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert a SQLite BLOB back to an f32 vector.
///
/// Returns `None` when the length is not a multiple of four bytes.
pub fn blob_to_vec(blob: &[u8]) -> Option<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return None;
    }
    Some(
        blob.chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect(),
    )
}

/// Cosine similarity of two equal-length vectors. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let (mut dot, mut na, mut nb) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    let denom = na.sqrt() * nb.sqrt();
    if denom > f32::EPSILON { dot / denom } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_layout_is_little_endian() {
        let blob = vec_to_blob(&[1.0]);
        assert_eq!(blob, 1.0f32.to_le_bytes().to_vec());
        assert_eq!(blob_to_vec(&blob), Some(vec![1.0]));
    }

    #[test]
    fn truncated_blob_is_rejected() {
        assert_eq!(blob_to_vec(&[0, 0, 128]), None);
        assert_eq!(blob_to_vec(&[]), Some(vec![]));
    }

    #[test]
    fn cosine_ignores_magnitude() {
        let a = [1.0, 2.0, 3.0];
        let b = [2.0, 4.0, 6.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_and_opposite() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
