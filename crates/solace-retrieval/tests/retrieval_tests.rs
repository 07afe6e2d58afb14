// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Index loading and ranking against fixture files.

use std::sync::Arc;

use proptest::prelude::*;
use solace_core::SolaceError;
use solace_retrieval::{VectorIndex, VectorRetriever};
use solace_test_utils::{FixturePassage, MockEmbedder, write_index, write_raw_index};

const CORPUS: &[&str] = &[
    "Anxiety is a feeling of worry, nervousness or unease about something uncertain.",
    "Slow breathing exercises can calm the body during a panic attack.",
    "The final exam lasts two hours and takes place in the main hall.",
    "Regular sleep and exercise reduce stress before an exam.",
];

async fn load(embedder: Arc<MockEmbedder>, passages: &[&str]) -> (tempfile::TempDir, VectorRetriever) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.db");
    let fixtures: Vec<FixturePassage> = passages.iter().map(|p| FixturePassage::from(*p)).collect();
    write_index(&path, &embedder, &fixtures).unwrap();
    let retriever = VectorIndex::load(&path, embedder).await.unwrap();
    (dir, retriever)
}

#[tokio::test]
async fn anxiety_query_ranks_definition_first() {
    let (_dir, retriever) = load(Arc::new(MockEmbedder::new(128)), CORPUS).await;
    assert_eq!(retriever.len(), 4);
    assert_eq!(retriever.dimensions(), 128);

    let passages = retriever.retrieve("What is anxiety?", 2).await.unwrap();
    assert_eq!(passages.len(), 2);
    assert!(passages[0].content.starts_with("Anxiety is"));
    assert!(passages[0].score >= passages[1].score);
}

#[tokio::test]
async fn exam_query_prefers_exam_passages() {
    let (_dir, retriever) = load(Arc::new(MockEmbedder::new(128)), CORPUS).await;
    let passages = retriever.retrieve("How long is the final exam?", 1).await.unwrap();
    assert!(passages[0].content.contains("final exam"));
}

#[tokio::test]
async fn empty_index_skips_embedding() {
    let embedder = Arc::new(MockEmbedder::new(16));
    let (_dir, retriever) = load(embedder.clone(), &[]).await;
    assert!(retriever.is_empty());
    assert!(retriever.retrieve("anything", 4).await.unwrap().is_empty());
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn dimension_mismatch_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.db");
    write_index(&path, &MockEmbedder::new(32), &["Anxiety is common.".into()]).unwrap();

    let err = VectorIndex::load(&path, Arc::new(MockEmbedder::new(16)))
        .await
        .err()
        .expect("load should fail");
    assert!(matches!(
        err,
        SolaceError::IndexIncompatible { expected: 16, actual: 32, .. }
    ));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn metadata_and_source_are_returned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("index.db");
    let embedder = Arc::new(MockEmbedder::new(32));
    write_index(
        &path,
        &embedder,
        &[FixturePassage::new("Exam rooms open at nine.")
            .with_source("handbook.pdf")
            .with_metadata(serde_json::json!({"page": 12}))],
    )
    .unwrap();

    let retriever = VectorIndex::load(&path, embedder).await.unwrap();
    assert_eq!(
        retriever.index().and_then(|i| i.embedding_model()),
        Some("mock-embedder")
    );
    let p = &retriever.retrieve("exam rooms", 1).await.unwrap()[0];
    assert_eq!(p.source.as_deref(), Some("handbook.pdf"));
    assert_eq!(p.metadata, Some(serde_json::json!({"page": 12})));
}

#[tokio::test]
async fn embedding_failure_is_model_invocation() {
    let embedder = Arc::new(MockEmbedder::new(32));
    let (_dir, retriever) = load(embedder.clone(), CORPUS).await;
    embedder.fail_with("onnx session crashed").await;

    let err = retriever.retrieve("anxiety", 2).await.unwrap_err();
    assert!(matches!(err, SolaceError::ModelInvocation { .. }));
    assert!(!err.is_fatal());
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn results_are_bounded_and_descending(
        vectors in prop::collection::vec(prop::collection::vec(-1.0f32..1.0, 4), 0..12),
        k in 0usize..16,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");
        let rows: Vec<(FixturePassage, Vec<f32>)> = vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (FixturePassage::new(format!("passage {i}")), v.clone()))
            .collect();
        write_raw_index(&path, 4, None, &rows).unwrap();

        let rt = runtime();
        let out = rt.block_on(async {
            let retriever = VectorIndex::load(&path, Arc::new(MockEmbedder::new(4))).await.unwrap();
            retriever.retrieve("anxiety exam breathing", k).await.unwrap()
        });

        prop_assert!(out.len() <= k.min(vectors.len()));
        for pair in out.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}
