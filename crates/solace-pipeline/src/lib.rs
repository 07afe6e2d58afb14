// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational question answering over a retrieval index.
//!
//! A turn runs three stages in order: the raw query is rewritten into a
//! standalone question using the history, passages are retrieved for it,
//! and an answer grounded on those passages is generated.

pub mod contextualizer;
pub mod generator;
pub mod orchestrator;
pub mod prompts;

pub use contextualizer::QueryContextualizer;
pub use generator::AnswerGenerator;
pub use orchestrator::{ConversationPipeline, PipelineOptions, PipelineResponse};
