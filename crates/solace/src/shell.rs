// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `solace shell` command implementation.
//!
//! Interactive REPL with a colored prompt and readline history. The shell
//! owns the conversation: after every successful turn it replaces its
//! history with the one the pipeline returned. Nothing is persisted.

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use solace_config::SolaceConfig;
use solace_core::{ConversationHistory, SolaceError};
use solace_pipeline::ConversationPipeline;

use crate::bootstrap;

const HELP: &str = "\
/history  print the conversation so far
/reset    start a new conversation
/help     show this help
/quit     exit";

/// One line of shell input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Empty,
    Quit,
    Reset,
    History,
    Help,
    Unknown(&'a str),
    Ask(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        match trimmed {
            "" => Self::Empty,
            "/quit" | "/exit" => Self::Quit,
            "/reset" => Self::Reset,
            "/history" => Self::History,
            "/help" => Self::Help,
            cmd if cmd.starts_with('/') => Self::Unknown(cmd),
            query => Self::Ask(query),
        }
    }
}

/// What the REPL should do after a line.
#[derive(Debug, PartialEq, Eq)]
enum Reply {
    Nothing,
    Exit,
    Info(String),
    Answer(String),
    Error(String),
}

/// Session state for one shell run.
struct ShellSession {
    pipeline: ConversationPipeline,
    history: ConversationHistory,
}

impl ShellSession {
    fn new(pipeline: ConversationPipeline) -> Self {
        Self {
            pipeline,
            history: ConversationHistory::new(),
        }
    }

    async fn handle(&mut self, line: &str) -> Reply {
        match Command::parse(line) {
            Command::Empty => Reply::Nothing,
            Command::Quit => Reply::Exit,
            Command::Help => Reply::Info(HELP.to_string()),
            Command::Reset => {
                self.history = ConversationHistory::new();
                Reply::Info("conversation cleared".to_string())
            }
            Command::History if self.history.is_empty() => {
                Reply::Info("no conversation yet".to_string())
            }
            Command::History => Reply::Info(self.history.transcript().trim_end().to_string()),
            Command::Unknown(cmd) => Reply::Error(format!("unknown command {cmd}, try /help")),
            Command::Ask(query) => match self.pipeline.invoke(query, &self.history).await {
                Ok(response) => {
                    self.history = response.history;
                    Reply::Answer(response.answer)
                }
                Err(e) => Reply::Error(e.to_string()),
            },
        }
    }
}

/// Runs the `solace shell` interactive REPL.
pub async fn run_shell(config: &SolaceConfig) -> Result<(), SolaceError> {
    let app = bootstrap::assemble(config).await?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| SolaceError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("{} shell", config.app.name).bold().green());
    println!(
        "{}",
        format!(
            "answers by {}, retrieval by {} ({} dimensions)",
            app.llm.name(),
            app.embedder.name(),
            app.embedder.dimensions()
        )
        .dimmed()
    );
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());

    let mut session = ShellSession::new(app.pipeline);
    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                match session.handle(&line).await {
                    Reply::Nothing => {}
                    Reply::Exit => break,
                    Reply::Info(text) => println!("{}", text.dimmed()),
                    Reply::Answer(text) => println!("{text}\n"),
                    Reply::Error(message) => eprintln!("{}: {message}", "error".red()),
                }
            }
            // Ctrl+C and Ctrl+D both end the session.
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    Ok(())
}
