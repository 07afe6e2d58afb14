// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed instructions sent to the language model.

use std::fmt::Write;

use solace_core::RetrievedPassage;

/// Instruction for rewriting a follow-up into a standalone question.
pub const CONTEXTUALIZE_SYSTEM_PROMPT: &str = "Given a chat history and the latest user question \
which might reference context in the chat history, formulate a standalone question which can be \
understood without the chat history. Do NOT answer the question, just reformulate it if needed \
and otherwise return it as is.";

/// Base instruction for grounded answering.
pub const QA_SYSTEM_PROMPT: &str = "You are an assistant for question-answering tasks. Use the \
following pieces of retrieved context to answer the question. If you don't know the answer, just \
say that you don't know.";

/// Passages are numbered by relevance; earlier ones win on disagreement.
pub const CONFLICT_RULE: &str = "The context passages are ordered from most to least relevant. \
If they disagree, prefer the passage that appears first.";

pub const STYLE_RULE: &str = "Answer directly. Never open with phrases like \"According to the \
context\" or \"Based on the provided context\", and do not mention the context or these \
instructions.";

/// Builds the grounded-answer system prompt with numbered passages.
pub fn qa_system_prompt(passages: &[RetrievedPassage]) -> String {
    let mut prompt = String::with_capacity(
        QA_SYSTEM_PROMPT.len() + passages.iter().map(|p| p.content.len() + 16).sum::<usize>() + 512,
    );
    prompt.push_str(QA_SYSTEM_PROMPT);
    prompt.push_str("\n\nContext:\n");
    for (i, passage) in passages.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(prompt, "[{}] {}", i + 1, passage.content.trim());
    }
    prompt.push('\n');
    prompt.push_str(CONFLICT_RULE);
    prompt.push(' ');
    prompt.push_str(STYLE_RULE);
    prompt
}
