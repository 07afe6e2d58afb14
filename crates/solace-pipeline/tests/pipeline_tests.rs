// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end conversational turns over mock models and a fixture index.
//!
//! Generation is scripted, so these tests check policy (grounding,
//! fallback, history handling, stage reporting) rather than wording.

use proptest::prelude::*;
use solace_core::{
    ConversationHistory, ConversationTurn, PipelineStage, Role, SolaceError, Speaker,
};
use solace_pipeline::prompts::{CONTEXTUALIZE_SYSTEM_PROMPT, QA_SYSTEM_PROMPT};
use solace_test_utils::TestHarness;

const CORPUS: &[&str] = &[
    "Anxiety before a presentation is common; rehearsing and slow breathing help manage it.",
    "Before an exam, get enough sleep and review your notes in short sessions to manage stress.",
    "The library opens at eight in the morning on weekdays.",
    "Panic attacks usually peak within ten minutes.",
];

fn exam_history() -> ConversationHistory {
    [
        ConversationTurn::user("I have a big exam tomorrow").unwrap(),
        ConversationTurn::assistant("That's understandable, exams can be stressful.").unwrap(),
    ]
    .into_iter()
    .collect()
}

#[tokio::test]
async fn first_question_is_answered_from_passages() {
    let harness = TestHarness::builder()
        .with_passages(CORPUS.iter().copied())
        .with_top_k(2)
        .with_mock_responses([
            "According to the context, rehearse your talk and breathe slowly to manage anxiety.",
        ])
        .build()
        .await
        .unwrap();

    let query = "How can I manage anxiety before a presentation?";
    let response = harness.ask(query, &ConversationHistory::new()).await.unwrap();

    assert_eq!(response.standalone_query, query);
    assert_eq!(
        response.answer,
        "Rehearse your talk and breathe slowly to manage anxiety."
    );
    assert!(!response.passages_used.is_empty() && response.passages_used.len() <= 2);
    assert!(response.passages_used[0].content.starts_with("Anxiety before a presentation"));

    assert_eq!(response.history.len(), 2);
    assert_eq!(response.history.turns()[0].speaker(), Speaker::User);
    assert_eq!(response.history.turns()[0].text(), query);
    assert_eq!(response.history.turns()[1].speaker(), Speaker::Assistant);
    assert_eq!(response.history.turns()[1].text(), response.answer);

    // No history, so only the generation call reaches the model.
    let requests = harness.mock_provider.requests().await;
    assert_eq!(requests.len(), 1);
    let system = requests[0].system_prompt.as_deref().unwrap();
    assert!(system.starts_with(QA_SYSTEM_PROMPT));
    assert!(system.contains("[1] Anxiety before a presentation"));
    assert_eq!(requests[0].messages.len(), 1);
    assert_eq!(requests[0].messages[0].content, query);
}

#[tokio::test]
async fn follow_up_pronoun_is_resolved_before_retrieval() {
    let rewritten = "Any tips for managing stress before an exam?";
    let harness = TestHarness::builder()
        .with_passages(CORPUS.iter().copied())
        .with_mock_responses([
            format!("Standalone question: \"{rewritten}\""),
            "Sleep well and review your notes in short sessions.".to_string(),
        ])
        .build()
        .await
        .unwrap();

    let history = exam_history();
    let response = harness.ask("Any tips for that?", &history).await.unwrap();

    assert_eq!(response.standalone_query, rewritten);
    assert!(
        !response
            .standalone_query
            .split(|c: char| !c.is_alphanumeric())
            .any(|w| w.eq_ignore_ascii_case("that")),
        "rewritten query still contains a bare pronoun"
    );
    assert!(response.passages_used[0].content.starts_with("Before an exam"));

    let requests = harness.mock_provider.requests().await;
    assert_eq!(requests.len(), 2);

    let rewrite = &requests[0];
    assert_eq!(rewrite.system_prompt.as_deref(), Some(CONTEXTUALIZE_SYSTEM_PROMPT));
    assert_eq!(rewrite.messages.len(), 3);
    assert_eq!(rewrite.messages[0].role, Role::User);
    assert_eq!(rewrite.messages[1].role, Role::Assistant);
    assert_eq!(rewrite.messages[2].content, "Any tips for that?");

    let answer = &requests[1];
    assert_eq!(answer.messages.len(), 3);
    assert_eq!(answer.messages[2].content, rewritten);

    // The original phrasing is what the history records.
    assert_eq!(response.history.len(), 4);
    assert_eq!(response.history.turns()[2].text(), "Any tips for that?");
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn empty_index_answers_with_fallback_without_calling_the_model() {
    let harness = TestHarness::builder().build().await.unwrap();

    let response = harness
        .ask("What is the capital of Mongolia?", &ConversationHistory::new())
        .await
        .unwrap();

    assert!(response.answer.contains("don't know"));
    assert!(response.passages_used.is_empty());
    assert_eq!(response.history.len(), 2);
    assert_eq!(harness.mock_provider.request_count().await, 0);
    assert_eq!(harness.embedder.calls(), 0);
}

#[tokio::test]
async fn unloaded_retriever_behaves_like_empty_index() {
    let harness = TestHarness::builder()
        .without_index()
        .with_fallback_answer("I don't know that yet.")
        .with_mock_responses(["What does the handbook say about exams?"])
        .build()
        .await
        .unwrap();

    let response = harness.ask("what about it?", &exam_history()).await.unwrap();
    assert_eq!(response.answer, "I don't know that yet.");
    assert_eq!(response.history.len(), 4);
    // The rewrite still runs; generation is skipped.
    assert_eq!(harness.mock_provider.request_count().await, 1);
}

#[tokio::test]
async fn empty_model_answer_becomes_fallback() {
    let harness = TestHarness::builder()
        .with_passages(CORPUS.iter().copied())
        .with_mock_responses(["According to the context,"])
        .build()
        .await
        .unwrap();

    let response = harness
        .ask("When does the library open?", &ConversationHistory::new())
        .await
        .unwrap();
    assert!(response.answer.contains("don't know"));
    assert_eq!(response.history.len(), 2);
}

#[tokio::test]
async fn blank_rewrite_falls_back_to_raw_query() {
    let harness = TestHarness::builder()
        .with_passages(CORPUS.iter().copied())
        .with_mock_responses(["   ", "Panic attacks peak within ten minutes."])
        .build()
        .await
        .unwrap();

    let response = harness
        .ask("How long do panic attacks last?", &exam_history())
        .await
        .unwrap();
    assert_eq!(response.standalone_query, "How long do panic attacks last?");
}

#[tokio::test]
async fn blank_query_is_rejected_before_any_stage() {
    let harness = TestHarness::builder()
        .with_passages(CORPUS.iter().copied())
        .build()
        .await
        .unwrap();

    let err = harness.ask("  \n", &exam_history()).await.unwrap_err();
    assert!(matches!(err, SolaceError::EmptyQuery));
    assert_eq!(harness.mock_provider.request_count().await, 0);
    assert_eq!(harness.embedder.calls(), 0);
}

#[tokio::test]
async fn failures_name_the_stage() {
    let harness = TestHarness::builder()
        .with_passages(CORPUS.iter().copied())
        .build()
        .await
        .unwrap();
    let history = exam_history();

    harness.mock_provider.add_failure("rewrite timed out").await;
    let err = harness.ask("Any tips for that?", &history).await.unwrap_err();
    assert_eq!(err.stage(), Some(PipelineStage::Contextualizing));

    harness.embedder.fail_with("session poisoned").await;
    let err = harness.ask("What is anxiety?", &ConversationHistory::new()).await.unwrap_err();
    assert_eq!(err.stage(), Some(PipelineStage::Retrieving));
    harness.embedder.recover().await;

    harness.mock_provider.add_failure("generation refused").await;
    let err = harness
        .ask("What is anxiety?", &ConversationHistory::new())
        .await
        .unwrap_err();
    assert_eq!(err.stage(), Some(PipelineStage::Generating));
    match err {
        SolaceError::Pipeline { source, .. } => {
            assert!(matches!(*source, SolaceError::ModelInvocation { .. }));
        }
        other => panic!("expected pipeline error, got {other:?}"),
    }

    // Failed turns leave the caller's history as it was.
    assert_eq!(history, exam_history());
}

#[tokio::test]
async fn concurrent_turns_are_independent() {
    let harness = TestHarness::builder()
        .with_passages(CORPUS.iter().copied())
        .build()
        .await
        .unwrap();

    let queries: Vec<String> = (0..8).map(|i| format!("Question {i} about anxiety?")).collect();
    let empty = ConversationHistory::new();
    let responses =
        futures::future::join_all(queries.iter().map(|q| harness.pipeline.invoke(q, &empty))).await;

    for (query, response) in queries.iter().zip(responses) {
        let response = response.unwrap();
        assert_eq!(response.history.len(), 2);
        assert_eq!(response.history.turns()[0].text(), query);
        assert_eq!(response.answer, "mock response");
    }
    assert_eq!(harness.mock_provider.request_count().await, 8);
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn every_turn_adds_exactly_two(
        exchanges in 0usize..4,
        query in "[a-z]{1,12}( [a-z]{1,12}){0,4}\\?",
        with_passages in any::<bool>(),
    ) {
        let rt = runtime();
        let (before, after) = rt.block_on(async {
            let mut builder = TestHarness::builder();
            if with_passages {
                builder = builder.with_passages(CORPUS.iter().copied());
            }
            let harness = builder.build().await.unwrap();

            let mut history = ConversationHistory::new();
            for i in 0..exchanges {
                history = history
                    .with_exchange(&format!("question {i}"), &format!("answer {i}"))
                    .unwrap();
            }
            let response = harness.ask(&query, &history).await.unwrap();
            (history, response.history)
        });

        prop_assert_eq!(after.len(), before.len() + 2);
        prop_assert_eq!(&after.turns()[..before.len()], before.turns());
        prop_assert_eq!(after.turns()[before.len()].text(), query.as_str());
        prop_assert_eq!(after.turns()[before.len() + 1].speaker(), Speaker::Assistant);
    }
}
