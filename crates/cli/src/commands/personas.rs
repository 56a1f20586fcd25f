//! Persona listing command handler.

use clap::Args;
use podium_core::AppResult;
use podium_prompt::{list_personas, load_persona};
use std::path::PathBuf;

/// List persona files in a directory
#[derive(Args, Debug)]
pub struct PersonasCommand {
    /// Directory holding persona (system prompt) files
    pub dir: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl PersonasCommand {
    pub fn execute(&self) -> AppResult<()> {
        tracing::info!("Listing personas in {:?}", self.dir);

        let personas = list_personas(&self.dir)?;

        if self.json {
            let entries: Vec<serde_json::Value> = personas
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "name": p.name,
                        "path": p.path,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        if personas.is_empty() {
            eprintln!("No personas found in {}", self.dir.display());
            return Ok(());
        }

        for persona in &personas {
            let preview = match load_persona(&persona.path) {
                Ok(text) => first_line(&text, 60),
                Err(e) => format!("<unreadable: {}>", e),
            };
            println!("{:<24} {}", persona.name, preview);
        }

        Ok(())
    }
}

fn first_line(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > max_chars {
        let cut: String = line.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}
