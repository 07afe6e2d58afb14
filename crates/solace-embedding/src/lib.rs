// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local embedding backend for Solace.
//!
//! Downloads a Hugging Face sentence-transformer's ONNX export on first use
//! and runs it on CPU with no external API calls.

pub mod embedder;
pub mod model_manager;

use std::path::PathBuf;

use solace_core::SolaceError;
use tracing::info;

pub use embedder::OnnxEmbedder;
pub use model_manager::ModelManager;

/// Fetches (if needed) and loads the named model.
pub async fn load_local_embedder(
    cache_dir: PathBuf,
    model_name: &str,
) -> Result<OnnxEmbedder, SolaceError> {
    let manager = ModelManager::new(cache_dir, model_name);
    let model_dir = manager.ensure_model().await?;
    let embedder = OnnxEmbedder::new(&model_dir, model_name)?;
    info!(
        model = model_name,
        dimensions = solace_core::EmbeddingAdapter::dimensions(&embedder),
        "local embedding model loaded"
    );
    Ok(embedder)
}
