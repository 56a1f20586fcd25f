//! Chunking of corpus documents into overlapping retrieval units.
//!
//! Chunks prefer to end just after a separator character (newline by
//! default) and fall back to a hard character cut. Every chunk after the
//! first repeats exactly `chunk_overlap` characters of its predecessor.

mod splitter;

pub use splitter::{ChunkConfig, ChunkSplitter, Chunks};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// A bounded substring of a source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Identifier, `<document id>:<position>`
    pub id: String,

    /// Source document identifier
    pub source_id: String,

    /// Source document path, for citations
    pub source_path: PathBuf,

    /// Chunk position in document (0-indexed)
    pub position: u32,

    /// Chunk text content, an exact substring of the document
    pub text: String,

    /// Metadata about the chunk
    pub metadata: ChunkMetadata,
}

/// How a chunk's end was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Ended just after a separator character
    Separator,
    /// No usable separator; cut at the size limit
    HardCut,
    /// Remainder of the document
    EndOfDocument,
}

/// Metadata about a chunk's origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Byte range in the original document
    pub byte_range: (usize, usize),

    /// Character count
    pub char_count: usize,

    /// Leading characters shared with the previous chunk
    pub overlap_chars: usize,

    /// How the end of the chunk was chosen
    pub boundary: Boundary,

    /// SHA-256 hash of chunk text
    pub hash: String,

    /// Timestamp when chunk was created
    pub created_at: DateTime<Utc>,
}

impl Chunk {
    pub(crate) fn new(
        source_id: &str,
        source_path: PathBuf,
        position: u32,
        text: &str,
        byte_range: (usize, usize),
        overlap_chars: usize,
        boundary: Boundary,
    ) -> Self {
        Self {
            id: format!("{}:{}", source_id, position),
            source_id: source_id.to_string(),
            source_path,
            position,
            text: text.to_string(),
            metadata: ChunkMetadata {
                byte_range,
                char_count: text.chars().count(),
                overlap_chars,
                boundary,
                hash: calculate_hash(text),
                created_at: Utc::now(),
            },
        }
    }

    /// Text contributed by this chunk beyond the overlap with its predecessor.
    pub fn fresh_text(&self) -> &str {
        match self.text.char_indices().nth(self.metadata.overlap_chars) {
            Some((idx, _)) => &self.text[idx..],
            None => "",
        }
    }
}

/// Lowercase hex SHA-256 of `text`.
pub fn calculate_hash(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_hash() {
        assert_eq!(
            calculate_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_chunk_records_overlap_and_hash() {
        let chunk = Chunk::new(
            "doc",
            PathBuf::from("a.txt"),
            1,
            "is blue. Grass",
            (8, 22),
            5,
            Boundary::HardCut,
        );

        assert_eq!(chunk.id, "doc:1");
        assert_eq!(chunk.fresh_text(), "ue. Grass");
        assert_eq!(chunk.metadata.char_count, 14);
        assert_eq!(chunk.metadata.hash, calculate_hash("is blue. Grass"));
    }
}
