//! Separator-preferring character splitter.

use super::{Boundary, Chunk};
use crate::types::Document;
use podium_core::{AppError, AppResult};

/// Configuration for the chunk splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Maximum characters per chunk
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks of one document
    pub chunk_overlap: usize,

    /// Preferred cut point; the separator stays with the earlier chunk
    pub separator: char,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separator: '\n',
        }
    }
}

impl ChunkConfig {
    /// Create a validated configuration with the newline separator.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> AppResult<Self> {
        let config = Self {
            chunk_size,
            chunk_overlap,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Use a different separator character.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Overlap must be strictly smaller than a non-zero size.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 || self.chunk_overlap >= self.chunk_size {
            return Err(AppError::InvalidChunkConfig {
                chunk_size: self.chunk_size,
                chunk_overlap: self.chunk_overlap,
            });
        }
        Ok(())
    }
}

/// Splits documents into overlapping chunks.
#[derive(Debug, Clone)]
pub struct ChunkSplitter {
    config: ChunkConfig,
}

impl ChunkSplitter {
    /// Create a splitter; rejects invalid configurations.
    pub fn new(config: ChunkConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Lazily split one document. The iterator can be cloned to restart.
    pub fn split<'a>(&self, document: &'a Document) -> Chunks<'a> {
        Chunks {
            document,
            config: self.config,
            start: 0,
            position: 0,
            done: false,
        }
    }

    /// Lazily split several documents, in document order.
    pub fn split_all<'a>(
        &'a self,
        documents: &'a [Document],
    ) -> impl Iterator<Item = Chunk> + Clone + 'a {
        documents.iter().flat_map(move |doc| self.split(doc))
    }
}

/// Iterator over the chunks of one document.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    document: &'a Document,
    config: ChunkConfig,
    /// Byte offset where the next chunk starts
    start: usize,
    position: u32,
    done: bool,
}

impl<'a> Chunks<'a> {
    fn emit(&mut self, end: usize, boundary: Boundary) -> Chunk {
        let text = &self.document.text[self.start..end];
        let overlap_chars = if self.position == 0 {
            0
        } else {
            self.config.chunk_overlap
        };

        let chunk = Chunk::new(
            &self.document.id,
            self.document.source.clone(),
            self.position,
            text,
            (self.start, end),
            overlap_chars,
            boundary,
        );
        self.position += 1;
        chunk
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let text = &self.document.text;
        if self.done || self.start >= text.len() {
            self.done = true;
            return None;
        }

        let rest = &text[self.start..];
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        // Byte offset (within `rest`) just past `size` characters.
        let window_end = match rest.char_indices().nth(size) {
            Some((idx, _)) => idx,
            None => {
                self.done = true;
                return Some(self.emit(text.len(), Boundary::EndOfDocument));
            }
        };

        // A chunk must hold more than `overlap` characters so the next one
        // starts strictly later. `rest` has more than `size` > `overlap` chars.
        let min_end = rest
            .char_indices()
            .nth(overlap + 1)
            .map(|(idx, _)| idx)
            .unwrap_or(window_end);

        let sep_len = self.config.separator.len_utf8();
        let (end, boundary) = match rest[..window_end].rfind(self.config.separator) {
            Some(idx) if idx + sep_len >= min_end => (idx + sep_len, Boundary::Separator),
            _ => (window_end, Boundary::HardCut),
        };

        // Next chunk starts `overlap` characters before this one ends.
        let next_start = if overlap == 0 {
            end
        } else {
            rest[..end]
                .char_indices()
                .rev()
                .nth(overlap - 1)
                .map(|(idx, _)| idx)
                .unwrap_or(0)
        };

        let chunk = self.emit(self.start + end, boundary);
        self.start += next_start;

        Some(chunk)
    }
}
