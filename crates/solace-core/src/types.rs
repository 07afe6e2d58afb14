// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Solace workspace.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::SolaceError;

/// Health status reported by an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the capability an adapter provides.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Embedding,
}

/// Which half of the provider registry a name was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    Embedding,
    Language,
}

/// Stages of a single pipeline invocation, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PipelineStage {
    Idle,
    Contextualizing,
    Retrieving,
    Generating,
    Done,
}

// --- Conversation types ---

/// Who authored a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// A single immutable turn of conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTurn {
    speaker: Speaker,
    text: String,
}

impl ConversationTurn {
    /// Creates a turn, rejecting text that is empty after trimming.
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Result<Self, SolaceError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(match speaker {
                Speaker::User => SolaceError::EmptyQuery,
                Speaker::Assistant => {
                    SolaceError::Internal("assistant turn must not be empty".to_string())
                }
            });
        }
        Ok(Self { speaker, text })
    }

    pub fn user(text: impl Into<String>) -> Result<Self, SolaceError> {
        Self::new(Speaker::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Result<Self, SolaceError> {
        Self::new(Speaker::Assistant, text)
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl<'de> Deserialize<'de> for ConversationTurn {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            speaker: Speaker,
            text: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        ConversationTurn::new(raw.speaker, raw.text).map_err(serde::de::Error::custom)
    }
}

/// Ordered conversation turns, oldest first.
///
/// The history is a value: extending it produces a new history and leaves
/// the original untouched. The owning session decides what to store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConversationTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Appends a turn in place. Intended for the owning session only.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// Returns a new history extended by a user turn followed by an assistant turn.
    pub fn with_exchange(&self, user: &str, assistant: &str) -> Result<Self, SolaceError> {
        let user = ConversationTurn::user(user)?;
        let assistant = ConversationTurn::assistant(assistant)?;
        let mut turns = Vec::with_capacity(self.turns.len() + 2);
        turns.extend_from_slice(&self.turns);
        turns.push(user);
        turns.push(assistant);
        Ok(Self { turns })
    }

    /// Renders the history as a plain-text transcript.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            let label = match turn.speaker {
                Speaker::User => "You",
                Speaker::Assistant => "Assistant",
            };
            out.push_str(label);
            out.push_str(": ");
            out.push_str(&turn.text);
            out.push('\n');
        }
        out
    }
}

impl FromIterator<ConversationTurn> for ConversationHistory {
    fn from_iter<I: IntoIterator<Item = ConversationTurn>>(iter: I) -> Self {
        Self {
            turns: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConversationHistory {
    type Item = &'a ConversationTurn;
    type IntoIter = std::slice::Iter<'a, ConversationTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

// --- Retrieval types ---

/// A corpus passage returned by the retriever for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub content: String,
    /// Cosine similarity to the query; higher is closer.
    pub score: f32,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

// --- Provider configuration ---

/// Resolved configuration for one provider: key name to value.
///
/// Values are kept as secrets so that `Debug` output and logs never
/// expose credentials.
#[derive(Clone, Default)]
pub struct ProviderConfig {
    provider: String,
    values: BTreeMap<String, SecretString>,
}

impl ProviderConfig {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .insert(key.into(), SecretString::from(value.into()));
    }

    /// Returns the value for `key`, if resolved.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.expose_secret())
    }

    /// Returns the value for `key` or a `ProviderConfig` error naming it.
    pub fn require(&self, key: &str) -> Result<&str, SolaceError> {
        self.get(key).ok_or_else(|| SolaceError::ProviderConfig {
            provider: self.provider.clone(),
            key: key.to_string(),
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

// --- Language model types ---

/// Role of a message sent to a language model.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl From<Speaker> for Role {
    fn from(speaker: Speaker) -> Self {
        match speaker {
            Speaker::User => Role::User,
            Speaker::Assistant => Role::Assistant,
        }
    }
}

/// A single message in a provider request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: Role,
    pub content: String,
}

impl ProviderMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<&ConversationTurn> for ProviderMessage {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.speaker().into(),
            content: turn.text().to_string(),
        }
    }
}

/// A provider-neutral generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// System instruction placed ahead of all messages.
    pub system_prompt: Option<String>,
    /// Conversation messages, oldest first; the last one is the prompt.
    pub messages: Vec<ProviderMessage>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

/// Token accounting reported by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A completed generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: TokenUsage,
}

// --- Embedding types ---

/// Input for an embedding adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingInput {
    pub texts: Vec<String>,
}

impl EmbeddingInput {
    pub fn single(text: impl Into<String>) -> Self {
        Self {
            texts: vec![text.into()],
        }
    }
}

/// Output from an embedding adapter: one vector per input text.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingOutput {
    pub embeddings: Vec<Vec<f32>>,
    pub dimensions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_turn_rejected() {
        assert!(ConversationTurn::user("").is_err());
        assert!(ConversationTurn::assistant("   \n").is_err());
        assert!(ConversationTurn::user("hi").is_ok());
    }

    #[test]
    fn with_exchange_leaves_original_untouched() {
        let history = ConversationHistory::new();
        let extended = history.with_exchange("hello", "hi there").unwrap();

        assert!(history.is_empty());
        assert_eq!(extended.len(), 2);
        assert_eq!(extended.turns()[0].speaker(), Speaker::User);
        assert_eq!(extended.turns()[0].text(), "hello");
        assert_eq!(extended.turns()[1].speaker(), Speaker::Assistant);
    }

    #[test]
    fn with_exchange_rejects_empty_answer() {
        let history = ConversationHistory::new();
        assert!(history.with_exchange("hello", "").is_err());
    }

    #[test]
    fn history_deserialize_rejects_empty_turn() {
        let json = r#"[{"speaker":"user","text":"hi"},{"speaker":"assistant","text":""}]"#;
        assert!(serde_json::from_str::<ConversationHistory>(json).is_err());

        let json = r#"[{"speaker":"user","text":"hi"}]"#;
        let history: ConversationHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn transcript_labels_speakers() {
        let history = ConversationHistory::new()
            .with_exchange("I feel tired", "That sounds hard.")
            .unwrap();
        assert_eq!(
            history.transcript(),
            "You: I feel tired\nAssistant: That sounds hard.\n"
        );
    }

    #[test]
    fn provider_config_debug_hides_values() {
        let mut config = ProviderConfig::new("groq");
        config.insert("GROQ_API_KEY", "gsk-secret");
        let debug = format!("{config:?}");
        assert!(debug.contains("GROQ_API_KEY"));
        assert!(!debug.contains("gsk-secret"));
        assert_eq!(config.get("GROQ_API_KEY"), Some("gsk-secret"));
    }

    #[test]
    fn provider_config_require_names_missing_key() {
        let config = ProviderConfig::new("gemini");
        let err = config.require("GEMINI_API_KEY").unwrap_err();
        assert!(matches!(
            err,
            SolaceError::ProviderConfig { ref provider, ref key }
                if provider == "gemini" && key == "GEMINI_API_KEY"
        ));
    }

    #[test]
    fn speaker_maps_to_role() {
        let turn = ConversationTurn::assistant("ok").unwrap();
        let msg = ProviderMessage::from(&turn);
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(Role::User.to_string(), "user");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn exchange_always_adds_two_turns(
                prior in proptest::collection::vec(("[a-z]{1,12}", "[a-z]{1,12}"), 0..6),
                user in "[a-z ]{0,4}[a-z]{1,8}",
                answer in "[a-z]{1,16}",
            ) {
                let mut history = ConversationHistory::new();
                for (u, a) in &prior {
                    history = history.with_exchange(u, a).unwrap();
                }
                let before = history.clone();
                let after = history.with_exchange(&user, &answer).unwrap();

                prop_assert_eq!(after.len(), before.len() + 2);
                prop_assert_eq!(&after.turns()[..before.len()], before.turns());
                prop_assert_eq!(after.turns()[before.len()].text(), user.as_str());
                prop_assert_eq!(after.turns()[before.len() + 1].speaker(), Speaker::Assistant);
            }
        }
    }
}
