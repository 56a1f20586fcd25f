//! Persona loader.
//!
//! A persona is a plain text file whose contents become the agent's system
//! instruction (e.g. `personas/affirmative.txt`).

use crate::types::PersonaEntry;
use podium_core::{AppError, AppResult};
use std::path::Path;

/// File extensions recognised as persona files.
const PERSONA_EXTENSIONS: &[&str] = &["txt", "md"];

/// Load a persona file and return its trimmed text.
///
/// # Example
/// ```no_run
/// use podium_prompt::load_persona;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let system_prompt = load_persona(Path::new("personas/affirmative.txt"))?;
/// println!("{}", system_prompt);
/// # Ok(())
/// # }
/// ```
pub fn load_persona(path: &Path) -> AppResult<String> {
    tracing::debug!("Loading persona from: {:?}", path);

    if !path.is_file() {
        return Err(AppError::Prompt(format!(
            "Persona file not found: {:?}",
            path
        )));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| {
        AppError::Prompt(format!("Failed to read persona file {:?}: {}", path, e))
    })?;

    let persona = contents.trim();
    if persona.is_empty() {
        return Err(AppError::Prompt(format!(
            "Persona file is empty: {:?}",
            path
        )));
    }

    tracing::info!("Loaded persona {:?} ({} chars)", path, persona.chars().count());

    Ok(persona.to_string())
}

/// List persona files directly inside `dir`, sorted by name.
pub fn list_personas(dir: &Path) -> AppResult<Vec<PersonaEntry>> {
    if !dir.is_dir() {
        return Err(AppError::Prompt(format!(
            "Persona directory not found: {:?}",
            dir
        )));
    }

    let mut personas = Vec::new();

    for entry in walkdir::WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_persona = path.is_file()
            && path
                .extension()
                .and_then(|s| s.to_str())
                .map(|ext| PERSONA_EXTENSIONS.contains(&ext))
                .unwrap_or(false);

        if is_persona {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                personas.push(PersonaEntry {
                    name: stem.to_string(),
                    path: path.to_path_buf(),
                });
            }
        }
    }

    Ok(personas)
}
