// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vector retrieval for Solace.
//!
//! A prebuilt SQLite index of passages and their embeddings is opened
//! read-only, loaded into memory once, and searched by cosine similarity.

pub mod index;
pub mod retriever;
pub mod schema;

pub use index::{StoredPassage, VectorIndex};
pub use retriever::VectorRetriever;
