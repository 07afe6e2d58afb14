// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `solace check` command implementation.
//!
//! Performs every startup step (provider resolution, index load) without
//! answering anything, and prints one line per step.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use colored::Colorize;
use solace_config::SolaceConfig;
use solace_core::{EmbeddingHandle, HealthStatus, SolaceError};
use solace_registry::ProviderRegistry;

use crate::bootstrap;

/// Status of a startup check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single startup check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }

    fn failed(name: &str, err: &SolaceError, start: Instant) -> Self {
        Self::new(name, CheckStatus::Fail, err.to_string(), start)
    }
}

/// Runs the `solace check` command. Returns `true` when nothing failed.
pub async fn run_check(config: &SolaceConfig) -> bool {
    let results = collect(config).await;
    let use_color = std::io::stdout().is_terminal();

    println!();
    println!("  {} check", config.app.name);
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", format_result(result, use_color));
    }
    println!();

    let failures = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    if failures == 0 {
        println!("  Ready to answer questions.");
    } else {
        let word = if failures == 1 { "check" } else { "checks" };
        println!("  {failures} {word} failed.");
    }
    println!();

    failures == 0
}

async fn collect(config: &SolaceConfig) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let start = Instant::now();
    let registry = match ProviderRegistry::from_config(config) {
        Ok(registry) => {
            results.push(CheckResult::new(
                "Secret store",
                CheckStatus::Pass,
                config.secrets.path.display().to_string(),
                start,
            ));
            registry
        }
        Err(e) => {
            results.push(CheckResult::failed("Secret store", &e, start));
            return results;
        }
    };

    results.push(check_language(&registry, config).await);

    let (embedding, embedder) = check_embedding(&registry, config).await;
    results.push(embedding);

    let start = Instant::now();
    results.push(match embedder {
        Some(embedder) => match bootstrap::load_index(&registry, config, embedder).await {
            Ok(retriever) if retriever.is_empty() => CheckResult::new(
                "Vector index",
                CheckStatus::Warn,
                "loaded, but holds no passages",
                start,
            ),
            Ok(retriever) => CheckResult::new(
                "Vector index",
                CheckStatus::Pass,
                format!(
                    "{} passages, {} dimensions",
                    retriever.len(),
                    retriever.dimensions()
                ),
                start,
            ),
            Err(e) => CheckResult::failed("Vector index", &e, start),
        },
        None => CheckResult::new(
            "Vector index",
            CheckStatus::Fail,
            "skipped, no embedding model",
            start,
        ),
    });

    results
}

async fn check_language(registry: &ProviderRegistry, config: &SolaceConfig) -> CheckResult {
    let start = Instant::now();
    let llm = match registry.resolve_language_provider(&config.llm.provider) {
        Ok(llm) => llm,
        Err(e) => return CheckResult::failed("Language model", &e, start),
    };
    let (status, message) = health(llm.health_check().await, llm.name());
    CheckResult::new("Language model", status, message, start)
}

async fn check_embedding(
    registry: &ProviderRegistry,
    config: &SolaceConfig,
) -> (CheckResult, Option<EmbeddingHandle>) {
    let start = Instant::now();
    match registry
        .resolve_embedding_provider(&config.embedding.provider)
        .await
    {
        Ok(embedder) => {
            let (status, message) = health(embedder.health_check().await, embedder.name());
            let message = format!("{message}, {} dimensions", embedder.dimensions());
            (
                CheckResult::new("Embedding model", status, message, start),
                Some(embedder),
            )
        }
        Err(e) => (CheckResult::failed("Embedding model", &e, start), None),
    }
}

fn health(status: Result<HealthStatus, SolaceError>, name: &str) -> (CheckStatus, String) {
    match status {
        Ok(HealthStatus::Healthy) => (CheckStatus::Pass, name.to_string()),
        Ok(HealthStatus::Degraded(reason)) => (CheckStatus::Warn, format!("{name}: {reason}")),
        Ok(HealthStatus::Unhealthy(reason)) => (CheckStatus::Fail, format!("{name}: {reason}")),
        Err(e) => (CheckStatus::Fail, format!("{name}: {e}")),
    }
}

fn format_result(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    let (symbol, message) = match (&result.status, use_color) {
        (CheckStatus::Pass, true) => ("✓".green().to_string(), result.message.clone()),
        (CheckStatus::Warn, true) => ("!".yellow().to_string(), result.message.yellow().to_string()),
        (CheckStatus::Fail, true) => ("✗".red().to_string(), result.message.red().to_string()),
        (CheckStatus::Pass, false) => ("[OK]  ".to_string(), result.message.clone()),
        (CheckStatus::Warn, false) => ("[WARN]".to_string(), result.message.clone()),
        (CheckStatus::Fail, false) => ("[FAIL]".to_string(), result.message.clone()),
    };
    format!(
        "    {symbol} {:<16} {message} ({duration_ms}ms)",
        result.name
    )
}
