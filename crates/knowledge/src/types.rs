//! Knowledge type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::chunk::Chunk;

/// A source document loaded from the corpus. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier (UUID v4)
    pub id: String,

    /// Path the document was read from
    pub source: PathBuf,

    /// Cleaned document text
    pub text: String,

    /// Size of the file on disk in bytes
    pub size_bytes: u64,

    /// When the document was read
    pub loaded_at: DateTime<Utc>,
}

impl Document {
    /// Create a document with a generated id and current timestamp.
    pub fn new(source: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source: source.into(),
            size_bytes: text.len() as u64,
            text,
            loaded_at: Utc::now(),
        }
    }

    /// File name of the source, for display.
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// A chunk returned by a vector index query.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    /// The matching chunk
    pub chunk: Chunk,

    /// Cosine similarity to the query (-1.0 to 1.0)
    pub score: f32,

    /// Cosine distance (`1 - score`); results are ordered by this
    pub distance: f32,
}

/// Per-document statistics for corpus inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Source path
    pub source: PathBuf,

    /// Number of characters in the document
    pub chars: usize,

    /// Number of chunks produced
    pub chunks: usize,

    /// Chunks cut at the separator
    pub separator_cuts: usize,

    /// Chunks cut mid-text because no separator fit
    pub hard_cuts: usize,
}
