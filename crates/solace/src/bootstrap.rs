// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Startup wiring: providers, index and pipeline.
//!
//! Everything here runs once per process. Any error is fatal and reported
//! before the first question is read.

use solace_config::SolaceConfig;
use solace_core::{EmbeddingHandle, LanguageHandle, RetrievedPassage, SolaceError};
use solace_pipeline::{ConversationPipeline, PipelineOptions};
use solace_registry::ProviderRegistry;
use solace_retrieval::{VectorIndex, VectorRetriever};
use tracing::{info, warn};

/// The assembled application.
pub struct App {
    pub pipeline: ConversationPipeline,
    pub embedder: EmbeddingHandle,
    pub llm: LanguageHandle,
}

/// Resolves the configured providers, loads the index and builds the pipeline.
pub async fn assemble(config: &SolaceConfig) -> Result<App, SolaceError> {
    let registry = ProviderRegistry::from_config(config)?;

    let embedder = registry
        .resolve_embedding_provider(&config.embedding.provider)
        .await?;
    let llm = registry.resolve_language_provider(&config.llm.provider)?;
    let retriever = load_index(&registry, config, embedder.clone()).await?;

    let pipeline =
        ConversationPipeline::new(llm.clone(), retriever, PipelineOptions::from_config(config));
    info!(
        embedding = %config.embedding.provider,
        llm = %config.llm.provider,
        top_k = pipeline.top_k(),
        "pipeline ready"
    );

    Ok(App {
        pipeline,
        embedder,
        llm,
    })
}

/// Loads the configured index for `embedder`, warning about suspicious pairings.
pub async fn load_index(
    registry: &ProviderRegistry,
    config: &SolaceConfig,
    embedder: EmbeddingHandle,
) -> Result<VectorRetriever, SolaceError> {
    let retriever = VectorIndex::load(&config.index.path, embedder).await?;

    if retriever.is_empty() {
        warn!(
            path = %config.index.path.display(),
            "vector index has no passages; every answer will be the fallback"
        );
    }

    let indexed = retriever.index().and_then(|index| index.embedding_model());
    let configured = registry
        .resolve_config(&config.embedding.provider)
        .ok()
        .and_then(|c| c.get("EMBEDDING_MODEL_NAME").map(str::to_string));
    if let (Some(indexed), Some(configured)) = (indexed, configured.as_deref())
        && models_differ(indexed, configured)
    {
        warn!(
            indexed,
            configured, "index was built with a different embedding model of equal dimensionality"
        );
    }

    Ok(retriever)
}

/// Model names are compared without case and without an organisation prefix,
/// so `sentence-transformers/all-MiniLM-L6-v2` matches `all-minilm-l6-v2`.
fn models_differ(indexed: &str, configured: &str) -> bool {
    fn base(name: &str) -> &str {
        name.trim().rsplit('/').next().unwrap_or(name)
    }
    !base(indexed).eq_ignore_ascii_case(base(configured))
}

/// Distinct passage sources in rank order.
pub fn source_labels(passages: &[RetrievedPassage]) -> Vec<&str> {
    let mut labels: Vec<&str> = Vec::new();
    for source in passages.iter().filter_map(|p| p.source.as_deref()) {
        if !labels.contains(&source) {
            labels.push(source);
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(source: Option<&str>) -> RetrievedPassage {
        RetrievedPassage {
            content: "text".into(),
            score: 0.5,
            source: source.map(str::to_string),
            metadata: None,
        }
    }

    #[test]
    fn model_names_compare_loosely() {
        assert!(!models_differ(
            "sentence-transformers/all-MiniLM-L6-v2",
            "all-minilm-l6-v2"
        ));
        assert!(models_differ("all-MiniLM-L6-v2", "BAAI/bge-small-en-v1.5"));
    }

    #[test]
    fn sources_are_deduplicated_in_order() {
        let passages = [
            passage(Some("b.pdf")),
            passage(None),
            passage(Some("a.pdf")),
            passage(Some("b.pdf")),
        ];
        assert_eq!(source_labels(&passages), vec!["b.pdf", "a.pdf"]);
    }
}
