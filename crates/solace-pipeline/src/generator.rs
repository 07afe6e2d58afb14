// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grounded answer generation over retrieved passages.

use solace_core::{
    ConversationHistory, LanguageHandle, ProviderMessage, ProviderRequest, RetrievedPassage,
    SolaceError,
};
use tracing::{debug, instrument};

use crate::prompts::qa_system_prompt;

/// Openers that refer to the retrieved material instead of answering.
const META_PREFIXES: &[&str] = &[
    "according to the provided context",
    "according to the given context",
    "according to the context",
    "according to the information provided",
    "according to the provided information",
    "based on the provided context",
    "based on the given context",
    "based on the context",
    "based on the information provided",
    "based on the provided information",
    "from the provided context",
    "from the context",
    "in the provided context",
    "in the context provided",
    "the context states that",
    "the context says that",
];

/// Answers a standalone query from retrieved passages and the history.
#[derive(Clone)]
pub struct AnswerGenerator {
    llm: LanguageHandle,
    max_tokens: u32,
    temperature: Option<f32>,
    fallback_answer: String,
}

impl AnswerGenerator {
    pub fn new(llm: LanguageHandle, max_tokens: u32, fallback_answer: impl Into<String>) -> Self {
        Self {
            llm,
            max_tokens,
            temperature: None,
            fallback_answer: fallback_answer.into(),
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Answer returned when there is nothing to ground on.
    pub fn fallback_answer(&self) -> &str {
        &self.fallback_answer
    }

    /// Produces the answer text.
    ///
    /// With no passages the fallback answer is returned and the model is
    /// not called.
    #[instrument(
        name = "generate",
        skip_all,
        fields(passages = passages.len(), history_turns = history.len())
    )]
    pub async fn generate(
        &self,
        standalone_query: &str,
        passages: &[RetrievedPassage],
        history: &ConversationHistory,
    ) -> Result<String, SolaceError> {
        if passages.is_empty() {
            debug!("no passages retrieved, returning fallback answer");
            return Ok(self.fallback_answer.clone());
        }

        let mut messages: Vec<ProviderMessage> = history.iter().map(ProviderMessage::from).collect();
        messages.push(ProviderMessage::user(standalone_query));

        let response = self
            .llm
            .complete(ProviderRequest {
                system_prompt: Some(qa_system_prompt(passages)),
                messages,
                max_tokens: self.max_tokens,
                temperature: self.temperature,
            })
            .await?;

        let answer = strip_meta_commentary(&response.content);
        if answer.is_empty() {
            debug!(provider = self.llm.name(), "model returned an empty answer");
            return Ok(self.fallback_answer.clone());
        }
        debug!(
            provider = self.llm.name(),
            output_tokens = response.usage.output_tokens,
            "answer generated"
        );
        Ok(answer)
    }
}

/// Removes a leading "According to the context,"-style opener and
/// re-capitalizes what follows.
pub fn strip_meta_commentary(answer: &str) -> String {
    let trimmed = answer.trim();
    let lower = trimmed.to_ascii_lowercase();

    let Some(prefix) = META_PREFIXES.iter().find(|p| {
        lower.starts_with(*p)
            && lower[p.len()..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric())
    }) else {
        return trimmed.to_string();
    };
    // ASCII lowercasing keeps byte offsets aligned with `trimmed`.
    let rest = trimmed[prefix.len()..]
        .trim_start_matches([',', ':', ';', ' ', '\t'])
        .trim_start();

    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
