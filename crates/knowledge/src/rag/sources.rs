//! Mapping retrieved chunks to user-facing source references.

use crate::rag::types::RagSourceRef;
use crate::types::ScoredChunk;
use std::collections::HashSet;

/// Maximum snippet length, in characters.
pub const MAX_SNIPPET_CHARS: usize = 150;

/// Map retrieved chunks to source references, de-duplicated by
/// (source, location) and kept in retrieval order.
pub fn map_chunks_to_sources(results: &[ScoredChunk]) -> Vec<RagSourceRef> {
    let mut seen = HashSet::new();
    let mut sources = Vec::new();

    for result in results {
        let chunk = &result.chunk;
        let source = source_name(&chunk.source_path);
        let (start, end) = chunk.metadata.byte_range;
        let location = format!("bytes {}-{}", start, end);

        if seen.insert((source.clone(), location.clone())) {
            sources.push(RagSourceRef {
                source,
                location,
                snippet: truncate_snippet(&chunk.text, MAX_SNIPPET_CHARS),
            });
        }
    }

    sources
}

fn source_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Truncate to at most `max_chars` characters, preferring a word boundary.
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let cut = match text.char_indices().nth(max_chars) {
        Some((idx, _)) => idx,
        None => return text.to_string(),
    };

    let truncated = &text[..cut];
    match truncated.rfind(char::is_whitespace) {
        Some(last_space) if last_space > 0 => format!("{}...", truncated[..last_space].trim_end()),
        _ => format!("{}...", truncated),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkConfig, ChunkSplitter};
    use crate::types::Document;

    fn scored(document: &Document, size: usize) -> Vec<ScoredChunk> {
        let splitter = ChunkSplitter::new(ChunkConfig::new(size, 0).unwrap()).unwrap();
        splitter
            .split(document)
            .map(|chunk| ScoredChunk {
                chunk,
                score: 0.5,
                distance: 0.5,
            })
            .collect()
    }

    #[test]
    fn test_truncate_snippet() {
        assert_eq!(truncate_snippet("Short text", 100), "Short text");

        let long = "This is a very long text that should be truncated at a word boundary";
        let result = truncate_snippet(long, 30);
        assert!(result.ends_with("..."));
        assert!(result.chars().count() <= 33);
        assert_eq!(result, "This is a very long text that...");
    }

    #[test]
    fn test_truncate_snippet_multibyte() {
        let text = "ééééééééééééééééééééé";
        assert_eq!(truncate_snippet(text, 5), "ééééé...");
    }

    #[test]
    fn test_sources_use_file_name_and_byte_range() {
        let document = Document::new("/corpus/motions/cars.txt", "Cars pollute.\nBikes do not.\n");
        let sources = map_chunks_to_sources(&scored(&document, 14));

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].source, "cars.txt");
        assert_eq!(sources[0].location, "bytes 0-14");
        assert_eq!(sources[0].snippet, "Cars pollute.");
    }

    #[test]
    fn test_duplicate_hits_collapse() {
        let document = Document::new("cars.txt", "Cars pollute.");
        let mut results = scored(&document, 100);
        results.push(results[0].clone());

        assert_eq!(map_chunks_to_sources(&results).len(), 1);
    }
}
