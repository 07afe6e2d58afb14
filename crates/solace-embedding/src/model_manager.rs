// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Download and cache management for Hugging Face sentence-transformer models.
//!
//! A model named `org/name` is fetched once from the Hub (its ONNX export and
//! `tokenizer.json`) and cached under `<cache_dir>/models/org--name/`.

use std::path::{Path, PathBuf};

use solace_core::SolaceError;
use tokio::sync::Mutex;
use tracing::info;

/// Default Hugging Face Hub root.
pub const HUB_URL: &str = "https://huggingface.co";

const PROVIDER: &str = "huggingface";

/// Manages model download and path resolution for one model.
pub struct ModelManager {
    cache_dir: PathBuf,
    model_name: String,
    hub_url: String,
    /// Serializes downloads when several callers race on first use.
    download_lock: Mutex<()>,
}

impl ModelManager {
    pub fn new(cache_dir: PathBuf, model_name: impl Into<String>) -> Self {
        Self {
            cache_dir,
            model_name: model_name.into(),
            hub_url: HUB_URL.to_string(),
            download_lock: Mutex::new(()),
        }
    }

    /// Overrides the Hub root (mirrors, wiremock in tests).
    pub fn with_hub_url(mut self, url: impl Into<String>) -> Self {
        self.hub_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Returns the directory where this model's files are stored.
    pub fn model_dir(&self) -> PathBuf {
        self.cache_dir
            .join("models")
            .join(self.model_name.replace('/', "--"))
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir().join("model.onnx")
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.model_dir().join("tokenizer.json")
    }

    /// Returns true if both model and tokenizer files exist.
    pub fn is_model_available(&self) -> bool {
        self.model_path().exists() && self.tokenizer_path().exists()
    }

    fn file_urls(&self) -> [(&'static str, String); 2] {
        let root = format!("{}/{}/resolve/main", self.hub_url, self.model_name);
        [
            ("model.onnx", format!("{root}/onnx/model.onnx")),
            ("tokenizer.json", format!("{root}/tokenizer.json")),
        ]
    }

    /// Ensures the model files are present, downloading them if needed.
    ///
    /// Returns the model directory.
    pub async fn ensure_model(&self) -> Result<PathBuf, SolaceError> {
        let _guard = self.download_lock.lock().await;
        if self.is_model_available() {
            return Ok(self.model_dir());
        }

        info!(model = %self.model_name, "embedding model not cached, downloading from Hugging Face");

        let model_dir = self.model_dir();
        tokio::fs::create_dir_all(&model_dir)
            .await
            .map_err(|e| init_error(format!("failed to create model directory: {e}")))?;

        for (filename, url) in self.file_urls() {
            let dest = model_dir.join(filename);
            if dest.exists() {
                continue;
            }

            match download_file(&url, &dest).await {
                Ok(size) => info!(file = filename, bytes = size, "downloaded model file"),
                Err(e) => {
                    let _ = tokio::fs::remove_file(&dest).await;
                    return Err(e);
                }
            }
        }

        info!(path = %model_dir.display(), "embedding model ready");
        Ok(model_dir)
    }
}

fn init_error(message: String) -> SolaceError {
    SolaceError::ProviderInit {
        provider: PROVIDER.to_string(),
        message,
        source: None,
    }
}

/// Downloads `url` to `dest`, writing through a temporary file so that an
/// interrupted download never leaves a truncated model behind.
async fn download_file(url: &str, dest: &Path) -> Result<usize, SolaceError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| init_error(format!("failed to download {url}: {e}")))?;

    if !response.status().is_success() {
        return Err(init_error(format!(
            "download failed with status {}: {url}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| init_error(format!("failed to read response body from {url}: {e}")))?;

    let partial = dest.with_extension("part");
    tokio::fs::write(&partial, &bytes)
        .await
        .map_err(|e| init_error(format!("failed to write {}: {e}", partial.display())))?;
    tokio::fs::rename(&partial, dest)
        .await
        .map_err(|e| init_error(format!("failed to move {}: {e}", dest.display())))?;

    Ok(bytes.len())
}
