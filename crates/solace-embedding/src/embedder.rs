// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ONNX embedding adapter for on-device sentence-transformer inference.
//!
//! Runs a BERT-family sentence transformer on CPU: tokenize, forward pass,
//! attention-masked mean pooling, L2 normalization.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use ndarray::Array2;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;
use tokenizers::{Tokenizer, TruncationParams};

use solace_core::{
    AdapterType, EmbeddingAdapter, EmbeddingInput, EmbeddingOutput, HealthStatus, PluginAdapter,
    SolaceError,
};

/// Longest token sequence fed to the model; BERT position embeddings stop at 512.
const MAX_SEQUENCE_LENGTH: usize = 512;

const PROVIDER: &str = "huggingface";

/// ONNX-based sentence embedder.
pub struct OnnxEmbedder {
    model_name: String,
    /// A forward pass needs `&mut Session`; the lock is held only for the pass.
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dimensions: usize,
}

// Safety: Session is only reached through the Mutex. Tokenizer encoding
// takes `&self` and holds no interior mutability.
unsafe impl Send for OnnxEmbedder {}
unsafe impl Sync for OnnxEmbedder {}

impl OnnxEmbedder {
    /// Loads `model.onnx` and `tokenizer.json` from `model_dir`.
    ///
    /// The output dimensionality is measured with a probe sentence so that
    /// any sentence-transformer export works, not only 384-dim ones.
    pub fn new(model_dir: &Path, model_name: impl Into<String>) -> Result<Self, SolaceError> {
        let tokenizer_path = model_dir.join("tokenizer.json");
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            init_error(format!(
                "failed to load tokenizer from {}: {e}",
                tokenizer_path.display()
            ))
        })?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| init_error(format!("failed to configure truncation: {e}")))?;

        let model_path = model_dir.join("model.onnx");
        let session = Session::builder()
            .map_err(|e| init_error(format!("failed to create ONNX session builder: {e}")))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| init_error(format!("failed to set optimization level: {e}")))?
            .with_intra_threads(1)
            .map_err(|e| init_error(format!("failed to set thread count: {e}")))?
            .commit_from_file(&model_path)
            .map_err(|e| {
                init_error(format!(
                    "failed to load ONNX model from {}: {e}",
                    model_path.display()
                ))
            })?;

        let mut embedder = Self {
            model_name: model_name.into(),
            session: Mutex::new(session),
            tokenizer,
            dimensions: 0,
        };
        embedder.dimensions = embedder
            .embed_text("dimension probe")
            .map_err(|e| init_error(format!("probe inference failed: {e}")))?
            .len();
        Ok(embedder)
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Embed a single text string into an L2-normalized vector.
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, SolaceError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| invocation(format!("tokenization failed: {e}")))?;

        let to_i64 = |values: &[u32]| values.iter().map(|&v| i64::from(v)).collect::<Vec<_>>();
        let input_ids = to_i64(encoding.get_ids());
        let attention_mask = to_i64(encoding.get_attention_mask());
        let token_type_ids = to_i64(encoding.get_type_ids());
        let seq_len = input_ids.len();

        let as_batch = |values: Vec<i64>, name: &str| {
            Array2::from_shape_vec((1, seq_len), values)
                .map_err(|e| invocation(format!("failed to shape {name}: {e}")))
        };
        let input_ids = as_batch(input_ids, "input_ids")?;
        let mask = as_batch(attention_mask.clone(), "attention_mask")?;
        let token_type_ids = as_batch(token_type_ids, "token_type_ids")?;

        let input_ids = TensorRef::from_array_view(&input_ids)
            .map_err(|e| invocation(format!("failed to create input_ids tensor: {e}")))?;
        let mask = TensorRef::from_array_view(&mask)
            .map_err(|e| invocation(format!("failed to create attention_mask tensor: {e}")))?;
        let token_type_ids = TensorRef::from_array_view(&token_type_ids)
            .map_err(|e| invocation(format!("failed to create token_type_ids tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| invocation(format!("ONNX session lock poisoned: {e}")))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => mask,
                "token_type_ids" => token_type_ids
            ])
            .map_err(|e| invocation(format!("ONNX inference failed: {e}")))?;

        // Token embeddings: [1, seq_len, hidden]
        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| invocation(format!("failed to extract output tensor: {e}")))?;
        let hidden_size = shape[shape.len() - 1] as usize;

        let pooled = mean_pool_with_attention(data, &attention_mask, seq_len, hidden_size);
        Ok(l2_normalize(&pooled))
    }
}

fn init_error(message: String) -> SolaceError {
    SolaceError::ProviderInit {
        provider: PROVIDER.to_string(),
        message,
        source: None,
    }
}

fn invocation(message: String) -> SolaceError {
    SolaceError::invocation(PROVIDER, message)
}

/// Mean of the token embeddings whose attention mask is set.
fn mean_pool_with_attention(
    embeddings: &[f32],
    attention_mask: &[i64],
    seq_len: usize,
    hidden_size: usize,
) -> Vec<f32> {
    let mut sum = vec![0.0f32; hidden_size];
    let mut count = 0.0f32;

    for (token, _) in attention_mask
        .iter()
        .take(seq_len)
        .enumerate()
        .filter(|(_, m)| **m > 0)
    {
        let row = &embeddings[token * hidden_size..(token + 1) * hidden_size];
        for (acc, v) in sum.iter_mut().zip(row) {
            *acc += v;
        }
        count += 1.0;
    }

    if count > 0.0 {
        sum.iter_mut().for_each(|v| *v /= count);
    }
    sum
}

fn l2_normalize(vec: &[f32]) -> Vec<f32> {
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        vec.iter().map(|v| v / norm).collect()
    } else {
        vec.to_vec()
    }
}

#[async_trait]
impl PluginAdapter for OnnxEmbedder {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, SolaceError> {
        match self.session.lock() {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("session lock poisoned: {e}"))),
        }
    }
}

#[async_trait]
impl EmbeddingAdapter for OnnxEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, SolaceError> {
        let embeddings = input
            .texts
            .iter()
            .map(|text| self.embed_text(text))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EmbeddingOutput {
            embeddings,
            dimensions: self.dimensions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l2_normalize_general_vector() {
        let n = l2_normalize(&[3.0, 4.0]);
        assert!((n[0] - 0.6).abs() < 0.001);
        assert!((n[1] - 0.8).abs() < 0.001);
    }

    #[test]
    fn l2_normalize_zero_vector() {
        assert_eq!(l2_normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn mean_pool_skips_padding() {
        let embeddings = vec![
            9.0, 9.0, 9.0, // padding
            1.0, 2.0, 3.0,
        ];
        let result = mean_pool_with_attention(&embeddings, &[0, 1], 2, 3);
        assert_eq!(result, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn mean_pool_averages_real_tokens() {
        let embeddings = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let result = mean_pool_with_attention(&embeddings, &[1, 1, 1], 3, 2);
        assert!((result[0] - 3.0).abs() < f32::EPSILON);
        assert!((result[1] - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_model_dir_is_an_init_error() {
        let err = OnnxEmbedder::new(Path::new("/nonexistent/model"), "org/model")
            .err()
            .expect("should fail without files");
        assert!(matches!(err, SolaceError::ProviderInit { ref provider, .. } if provider == "huggingface"));
    }
}
