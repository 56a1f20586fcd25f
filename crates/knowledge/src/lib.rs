//! Retrieval-augmented answering over a local document corpus.
//!
//! Pipeline: corpus loader → chunk splitter → embedder → vector index at
//! initialization; retriever → prompt composer → chat model per question.
//! [`RetrievalAgent`] runs it and [`AgentCache`] keeps one agent per process.

pub mod chunk;
pub mod embeddings;
pub mod loader;
pub mod progress;
pub mod rag;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use chunk::{Boundary, Chunk, ChunkConfig, ChunkSplitter};
pub use embeddings::{create_provider, Embedder, EmbeddingProvider, MockProvider};
pub use loader::load_corpus;
pub use progress::{ProgressEvent, ProgressReporter};
pub use rag::{
    AgentCache, AgentConfig, AgentOptions, AgentServices, ConversationHistory, RagResponse,
    RagSourceRef, RetrievalAgent, Turn,
};
pub use types::{Document, DocumentStats, ScoredChunk};
pub use vector_index::{FlatIndex, VectorIndex, DEFAULT_TOP_K};

use podium_core::AppResult;
use std::path::Path;

/// Load and chunk a corpus without embedding it, for inspection.
pub fn corpus_stats(
    dir: &Path,
    extension: &str,
    config: ChunkConfig,
) -> AppResult<Vec<DocumentStats>> {
    let documents = load_corpus(dir, extension, &ProgressReporter::noop())?;
    let splitter = ChunkSplitter::new(config)?;

    let stats = documents
        .iter()
        .map(|document| {
            let mut stats = DocumentStats {
                source: document.source.clone(),
                chars: document.text.chars().count(),
                chunks: 0,
                separator_cuts: 0,
                hard_cuts: 0,
            };
            for chunk in splitter.split(document) {
                stats.chunks += 1;
                match chunk.metadata.boundary {
                    Boundary::Separator => stats.separator_cuts += 1,
                    Boundary::HardCut => stats.hard_cuts += 1,
                    Boundary::EndOfDocument => {}
                }
            }
            stats
        })
        .collect();

    Ok(stats)
}
