// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestrator: contextualize, retrieve, generate.
//!
//! One [`ConversationPipeline`] is built at startup and shared. Each call
//! to [`ConversationPipeline::invoke`] is independent; the conversation
//! history travels in and out as a value and is never stored here.

use solace_config::SolaceConfig;
use solace_config::model::DEFAULT_FALLBACK_ANSWER;
use solace_core::{
    ConversationHistory, LanguageHandle, PipelineStage, RetrievedPassage, SolaceError,
};
use solace_retrieval::VectorRetriever;
use tracing::{debug, info, instrument};

use crate::contextualizer::QueryContextualizer;
use crate::generator::AnswerGenerator;

/// Tunables for a pipeline instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Passages retrieved per query.
    pub top_k: usize,
    pub answer_max_tokens: u32,
    pub contextualize_max_tokens: u32,
    pub temperature: Option<f32>,
    pub fallback_answer: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            top_k: 4,
            answer_max_tokens: 1024,
            contextualize_max_tokens: 256,
            temperature: None,
            fallback_answer: DEFAULT_FALLBACK_ANSWER.to_string(),
        }
    }
}

impl PipelineOptions {
    pub fn from_config(config: &SolaceConfig) -> Self {
        Self {
            top_k: config.index.top_k,
            answer_max_tokens: config.llm.max_tokens,
            contextualize_max_tokens: config.pipeline.contextualize_max_tokens,
            temperature: config.llm.temperature,
            fallback_answer: config.pipeline.fallback_answer.clone(),
        }
    }
}

/// Result of one conversational turn.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResponse {
    /// The assistant's reply.
    pub answer: String,
    /// Input history plus this exchange (user turn, then assistant turn).
    pub history: ConversationHistory,
    /// The query actually used for retrieval and generation.
    pub standalone_query: String,
    /// Passages the answer was grounded on, most relevant first.
    pub passages_used: Vec<RetrievedPassage>,
}

/// The process-wide question answering pipeline.
#[derive(Clone)]
pub struct ConversationPipeline {
    contextualizer: QueryContextualizer,
    retriever: VectorRetriever,
    generator: AnswerGenerator,
    top_k: usize,
}

impl ConversationPipeline {
    pub fn new(llm: LanguageHandle, retriever: VectorRetriever, options: PipelineOptions) -> Self {
        let contextualizer = QueryContextualizer::new(llm.clone(), options.contextualize_max_tokens)
            .with_temperature(options.temperature);
        let generator = AnswerGenerator::new(llm, options.answer_max_tokens, options.fallback_answer)
            .with_temperature(options.temperature);
        Self {
            contextualizer,
            retriever,
            generator,
            top_k: options.top_k,
        }
    }

    pub fn retriever(&self) -> &VectorRetriever {
        &self.retriever
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Answers `raw_query` in the context of `history`.
    ///
    /// Runs every stage in order. A failure is reported as
    /// [`SolaceError::Pipeline`] naming the stage; the caller's history is
    /// left untouched either way.
    #[instrument(name = "invoke", skip_all, fields(history_turns = history.len()))]
    pub async fn invoke(
        &self,
        raw_query: &str,
        history: &ConversationHistory,
    ) -> Result<PipelineResponse, SolaceError> {
        if raw_query.trim().is_empty() {
            return Err(SolaceError::EmptyQuery);
        }
        let mut stage = PipelineStage::Idle;
        debug!(%stage, "pipeline invoked");

        // Transition: Idle -> Contextualizing
        stage = PipelineStage::Contextualizing;
        let standalone_query = self
            .contextualizer
            .contextualize(raw_query, history)
            .await
            .map_err(|e| at(stage, e))?;

        // Transition: Contextualizing -> Retrieving
        stage = PipelineStage::Retrieving;
        let passages = self
            .retriever
            .retrieve(&standalone_query, self.top_k)
            .await
            .map_err(|e| at(stage, e))?;
        debug!(%stage, passages = passages.len(), "passages retrieved");

        // Transition: Retrieving -> Generating
        stage = PipelineStage::Generating;
        let answer = self
            .generator
            .generate(&standalone_query, &passages, history)
            .await
            .map_err(|e| at(stage, e))?;

        let history = history
            .with_exchange(raw_query, &answer)
            .map_err(|e| at(stage, e))?;

        // Transition: Generating -> Done
        stage = PipelineStage::Done;
        info!(
            %stage,
            rewritten = standalone_query != raw_query,
            passages = passages.len(),
            history_turns = history.len(),
            "conversation turn complete"
        );

        Ok(PipelineResponse {
            answer,
            history,
            standalone_query,
            passages_used: passages,
        })
    }
}

fn at(stage: PipelineStage, source: SolaceError) -> SolaceError {
    SolaceError::Pipeline {
        stage,
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_config() {
        let config = solace_config::load_config_from_str(
            r#"
[llm]
max_tokens = 300
temperature = 0.2

[index]
top_k = 6

[pipeline]
fallback_answer = "No idea."
contextualize_max_tokens = 64
"#,
        )
        .unwrap();
        let options = PipelineOptions::from_config(&config);
        assert_eq!(options.top_k, 6);
        assert_eq!(options.answer_max_tokens, 300);
        assert_eq!(options.contextualize_max_tokens, 64);
        assert_eq!(options.temperature, Some(0.2));
        assert_eq!(options.fallback_answer, "No idea.");
    }

    #[test]
    fn default_options_match_config_defaults() {
        let from_config = PipelineOptions::from_config(&SolaceConfig::default());
        assert_eq!(from_config, PipelineOptions::default());
    }

    #[test]
    fn stage_is_attached_to_errors() {
        let err = at(PipelineStage::Retrieving, SolaceError::invocation("mock", "down"));
        assert_eq!(err.stage(), Some(PipelineStage::Retrieving));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn completed_turn_is_logged() {
        use std::sync::Arc;

        use solace_test_utils::{MockEmbedder, MockProvider};

        let retriever = VectorRetriever::unloaded(Arc::new(MockEmbedder::default()));
        let pipeline = ConversationPipeline::new(
            Arc::new(MockProvider::new()),
            retriever,
            PipelineOptions::default(),
        );

        let response = pipeline
            .invoke("What is anxiety?", &ConversationHistory::new())
            .await
            .unwrap();
        assert_eq!(response.answer, DEFAULT_FALLBACK_ANSWER);
        assert!(logs_contain("conversation turn complete"));
        assert!(logs_contain("rewritten=false"));
    }
}
