//! Corpus loading and text extraction.

use crate::progress::ProgressReporter;
use crate::types::Document;
use podium_core::{AppError, AppResult};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Content type classification for corpus files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Markdown,
    PlainText,
    Unknown,
}

impl ContentType {
    /// Detect content type from file extension.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("md") | Some("markdown") => Self::Markdown,
            Some("txt") => Self::PlainText,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::PlainText => "text",
            Self::Unknown => "unknown",
        }
    }
}

/// Load every file with `extension` under `dir`, recursively, in sorted order.
///
/// Unreadable or binary files are skipped with a warning. Fails when the
/// directory is missing or yields no documents.
pub fn load_corpus(
    dir: &Path,
    extension: &str,
    progress: &ProgressReporter,
) -> AppResult<Vec<Document>> {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();

    if !dir.exists() {
        return Err(AppError::CorpusLoad(format!(
            "Corpus directory {:?} does not exist",
            dir
        )));
    }
    if !dir.is_dir() {
        return Err(AppError::CorpusLoad(format!(
            "Corpus path {:?} is not a directory",
            dir
        )));
    }

    tracing::info!("Loading *.{} corpus from {:?}", extension, dir);

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(AppError::CorpusLoad(format!(
                    "Failed to read corpus directory {:?}: {}",
                    dir, e
                )));
            }
            Err(e) => {
                tracing::warn!("Skipping unreadable corpus entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), &extension) {
            paths.push(entry.into_path());
        }
    }

    let total = paths.len() as u64;
    let mut documents = Vec::with_capacity(paths.len());

    for (i, path) in paths.iter().enumerate() {
        progress.load(i as u64 + 1, Some(total), &path.display().to_string());

        match parse_file(path) {
            Ok(text) => {
                let mut document = Document::new(path.clone(), text);
                if let Ok(meta) = fs::metadata(path) {
                    document.size_bytes = meta.len();
                }
                tracing::debug!(
                    "Loaded {:?} ({} bytes, {} chars)",
                    path,
                    document.size_bytes,
                    document.text.chars().count()
                );
                documents.push(document);
            }
            Err(e) => tracing::warn!("Skipping {:?}: {}", path, e),
        }
    }

    if documents.is_empty() {
        return Err(AppError::CorpusLoad(format!(
            "No readable *.{} files found in {:?}",
            extension, dir
        )));
    }

    tracing::info!("Loaded {} documents from {:?}", documents.len(), dir);
    Ok(documents)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Read a corpus file and extract clean text.
pub fn parse_file(path: &Path) -> AppResult<String> {
    let raw = fs::read_to_string(path)?;

    if !is_likely_text(&raw) {
        return Err(AppError::CorpusLoad(format!(
            "{:?} looks like a binary file",
            path
        )));
    }

    let cleaned = match ContentType::from_path(path) {
        ContentType::Markdown => clean_markdown(&raw),
        ContentType::PlainText | ContentType::Unknown => raw,
    };

    Ok(cleaned)
}

/// Strip heading markers, rules and code fences from markdown.
fn clean_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let trimmed = line.trim().trim_start_matches('#').trim_start();

        if trimmed.starts_with("---") || trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            continue;
        }

        if !trimmed.is_empty() {
            result.push_str(trimmed);
            result.push('\n');
        }
    }

    result.trim().to_string()
}

fn is_likely_text(data: &str) -> bool {
    !data.contains('\0')
}
