// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Solace - retrieval-augmented conversational question answering.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod bootstrap;
mod check;
mod providers;
mod shell;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use solace_config::SolaceConfig;
use solace_core::{ConversationHistory, SolaceError};

/// Solace - answers questions from an indexed knowledge corpus.
#[derive(Parser, Debug)]
#[command(name = "solace", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this TOML file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Answer a single question with no prior conversation.
    Ask {
        /// The question to answer.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Launch an interactive conversation.
    Shell,
    /// List supported providers and which of their keys are configured.
    Providers,
    /// Resolve the configured providers and load the index without answering.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            solace_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    let result = match cli.command {
        Some(Commands::Ask { query }) => run_ask(&config, &query.join(" ")).await,
        Some(Commands::Shell) => shell::run_shell(&config).await,
        Some(Commands::Providers) => providers::run_providers(&config),
        Some(Commands::Check) => {
            if !check::run_check(&config).await {
                std::process::exit(1);
            }
            Ok(())
        }
        None => {
            println!("solace: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {e}", "error".red());
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&Path>,
) -> Result<SolaceConfig, Vec<solace_config::ConfigError>> {
    match path {
        Some(path) => solace_config::load_and_validate_path(path),
        None => solace_config::load_and_validate(),
    }
}

/// Answers one question with an empty history and prints the answer.
async fn run_ask(config: &SolaceConfig, query: &str) -> Result<(), SolaceError> {
    let app = bootstrap::assemble(config).await?;
    let response = app.pipeline.invoke(query, &ConversationHistory::new()).await?;

    println!("{}", response.answer);
    let sources = bootstrap::source_labels(&response.passages_used);
    if !sources.is_empty() {
        println!("{}", format!("sources: {}", sources.join(", ")).dimmed());
    }
    Ok(())
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("solace={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn ask_joins_words() {
        let cli = Cli::try_parse_from(["solace", "ask", "what", "is", "anxiety?"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Ask {
                query: vec!["what".into(), "is".into(), "anxiety?".into()]
            })
        );
    }

    #[test]
    fn ask_requires_a_query() {
        assert!(Cli::try_parse_from(["solace", "ask"]).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["solace", "check", "--config", "/tmp/solace.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/solace.toml")));
        assert_eq!(cli.command, Some(Commands::Check));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solace.toml");
        std::fs::write(&path, "[index]\ntop_k = 7\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.index.top_k, 7);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
