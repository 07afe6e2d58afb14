// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `solace providers` command implementation.
//!
//! Lists every supported provider with its required keys and where each
//! key currently resolves from. Values are never printed.

use std::io::IsTerminal;

use colored::Colorize;
use solace_config::SolaceConfig;
use solace_core::SolaceError;
use solace_registry::{ProviderRegistry, ProviderStatus};

pub fn run_providers(config: &SolaceConfig) -> Result<(), SolaceError> {
    let registry = ProviderRegistry::from_config(config)?;
    let use_color = std::io::stdout().is_terminal();

    println!();
    print_section(
        "Embedding providers",
        &registry.supported_embedding_providers(),
        &config.embedding.provider,
        use_color,
    );
    print_section(
        "Language providers",
        &registry.supported_language_providers(),
        &config.llm.provider,
        use_color,
    );
    Ok(())
}

fn print_section(title: &str, statuses: &[ProviderStatus], selected: &str, use_color: bool) {
    if use_color {
        println!("  {}", title.bold());
    } else {
        println!("  {title}");
    }
    for status in statuses {
        for line in format_status(status, selected, use_color) {
            println!("{line}");
        }
    }
    println!();
}

fn format_status(status: &ProviderStatus, selected: &str, use_color: bool) -> Vec<String> {
    let mut header = format!("    {}", status.name);
    if status.name.eq_ignore_ascii_case(selected.trim()) {
        header.push_str(" (selected)");
    }
    let state = if status.is_configured() {
        "configured"
    } else {
        "incomplete"
    };
    let state = match (use_color, status.is_configured()) {
        (true, true) => state.green().to_string(),
        (true, false) => state.yellow().to_string(),
        (false, _) => state.to_string(),
    };
    let mut lines = vec![format!("{header:<28} {state}")];

    for key in &status.keys {
        let origin = match (&key.source, use_color) {
            (Some(label), _) => label.clone(),
            (None, true) => "missing".red().to_string(),
            (None, false) => "missing".to_string(),
        };
        lines.push(format!("      {:<28} {origin}", key.key));
    }
    lines
}

#[cfg(test)]
mod tests {
    use solace_registry::KeyStatus;

    use super::*;

    #[test]
    fn lists_keys_with_their_origin() {
        let status = ProviderStatus {
            name: "groq",
            keys: vec![
                KeyStatus {
                    key: "GROQ_API_KEY",
                    source: Some("environment".into()),
                },
                KeyStatus {
                    key: "GROQ_MODEL_NAME",
                    source: None,
                },
            ],
        };
        let lines = format_status(&status, "Groq", false);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("    groq (selected)"));
        assert!(lines[0].ends_with("incomplete"));
        assert!(lines[1].contains("GROQ_API_KEY") && lines[1].ends_with("environment"));
        assert!(lines[2].ends_with("missing"));
    }

    #[test]
    fn unselected_configured_provider() {
        let status = ProviderStatus {
            name: "huggingface",
            keys: vec![KeyStatus {
                key: "EMBEDDING_MODEL_NAME",
                source: Some("secret store secrets.toml".into()),
            }],
        };
        let lines = format_status(&status, "gemini", false);
        assert!(!lines[0].contains("(selected)"));
        assert!(lines[0].ends_with("configured"));
    }
}
