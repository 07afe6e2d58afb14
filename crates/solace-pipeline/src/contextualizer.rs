// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rewrites follow-up questions into standalone ones using the chat history.

use solace_core::{
    ConversationHistory, LanguageHandle, ProviderMessage, ProviderRequest, SolaceError,
};
use tracing::{debug, instrument};

use crate::prompts::CONTEXTUALIZE_SYSTEM_PROMPT;

/// Labels some models prepend to the rewritten question.
const ANSWER_LABELS: &[&str] = &[
    "standalone question:",
    "reformulated question:",
    "rewritten question:",
    "question:",
];

/// Turns `(raw query, history)` into a query that stands on its own.
#[derive(Clone)]
pub struct QueryContextualizer {
    llm: LanguageHandle,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl QueryContextualizer {
    pub fn new(llm: LanguageHandle, max_tokens: u32) -> Self {
        Self {
            llm,
            max_tokens,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Returns the standalone form of `raw_query`.
    ///
    /// With no history the query is returned as is and the model is not
    /// called.
    #[instrument(name = "contextualize", skip_all, fields(history_turns = history.len()))]
    pub async fn contextualize(
        &self,
        raw_query: &str,
        history: &ConversationHistory,
    ) -> Result<String, SolaceError> {
        if history.is_empty() {
            return Ok(raw_query.to_string());
        }

        let mut messages: Vec<ProviderMessage> = history.iter().map(ProviderMessage::from).collect();
        messages.push(ProviderMessage::user(raw_query));

        let response = self
            .llm
            .complete(ProviderRequest {
                system_prompt: Some(CONTEXTUALIZE_SYSTEM_PROMPT.to_string()),
                messages,
                max_tokens: self.max_tokens,
                temperature: self.temperature,
            })
            .await?;

        let standalone = normalize_rewrite(&response.content, raw_query);
        debug!(provider = self.llm.name(), standalone = %standalone, "query contextualized");
        Ok(standalone)
    }
}

/// Cleans model output down to a single question.
///
/// Takes the first line that still holds text once a leading label and
/// wrapping quotes are dropped. Preamble lines ending in `:` are skipped.
/// Falls back to `raw_query` if no line qualifies.
pub fn normalize_rewrite(output: &str, raw_query: &str) -> String {
    output
        .lines()
        .map(clean_line)
        .find(|l| !l.is_empty() && !l.ends_with(':'))
        .unwrap_or(raw_query)
        .to_string()
}

fn clean_line(line: &str) -> &str {
    let line = line.trim();
    let lower = line.to_ascii_lowercase();
    let unlabeled = ANSWER_LABELS
        .iter()
        .find(|label| lower.starts_with(*label))
        .map_or(line, |label| line[label.len()..].trim_start());
    strip_wrapping_quotes(unlabeled).trim()
}

fn strip_wrapping_quotes(s: &str) -> &str {
    const PAIRS: &[(char, char)] = &[('"', '"'), ('\'', '\''), ('`', '`'), ('\u{201c}', '\u{201d}')];
    let s = s.trim();
    for (open, close) in PAIRS {
        if let Some(inner) = s.strip_prefix(*open).and_then(|r| r.strip_suffix(*close)) {
            return inner;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_passes_through() {
        assert_eq!(
            normalize_rewrite("  How long is the exam?  ", "raw"),
            "How long is the exam?"
        );
    }

    #[test]
    fn label_and_quotes_are_stripped() {
        assert_eq!(
            normalize_rewrite("Standalone question: \"How long is the final exam?\"", "raw"),
            "How long is the final exam?"
        );
        assert_eq!(
            normalize_rewrite("QUESTION: 'What is anxiety?'", "raw"),
            "What is anxiety?"
        );
    }

    #[test]
    fn only_the_first_line_is_kept() {
        assert_eq!(
            normalize_rewrite("\n\nWhat causes panic attacks?\nThis rewrite resolves 'it'.", "raw"),
            "What causes panic attacks?"
        );
    }

    #[test]
    fn empty_output_falls_back_to_raw_query() {
        assert_eq!(normalize_rewrite("   \n ", "how long is it?"), "how long is it?");
        assert_eq!(normalize_rewrite("\"\"", "how long is it?"), "how long is it?");
        assert_eq!(normalize_rewrite("Standalone question:", "raw"), "raw");
    }

    #[test]
    fn preamble_line_is_skipped() {
        assert_eq!(
            normalize_rewrite(
                "Here is the reformulated question:\nWhat are some tips for managing stress before an exam?",
                "Any tips for that?"
            ),
            "What are some tips for managing stress before an exam?"
        );
        assert_eq!(
            normalize_rewrite("Standalone question:\n\n\"What is anxiety?\"", "raw"),
            "What is anxiety?"
        );
        assert_eq!(normalize_rewrite("Sure, here it is:\n", "raw"), "raw");
    }

    #[test]
    fn unicode_quotes_are_stripped() {
        assert_eq!(
            normalize_rewrite("\u{201c}Where is the exam held?\u{201d}", "raw"),
            "Where is the exam held?"
        );
    }
}
