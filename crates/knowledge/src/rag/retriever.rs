//! Question to top-k chunks.

use crate::embeddings::Embedder;
use crate::types::ScoredChunk;
use crate::vector_index::VectorIndex;
use podium_core::AppResult;
use std::sync::Arc;

/// Embeds a question and queries the vector index.
#[derive(Clone)]
pub struct Retriever {
    embedder: Embedder,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("chunks", &self.index.len())
            .field("top_k", &self.top_k)
            .finish()
    }
}

impl Retriever {
    pub fn new(embedder: Embedder, index: Arc<dyn VectorIndex>, top_k: usize) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Return the `top_k` nearest chunks, nearest first.
    pub async fn retrieve(&self, question: &str) -> AppResult<Vec<ScoredChunk>> {
        let query_embedding = self.embedder.embed_query(question).await?;
        let results = self.index.search(&query_embedding, self.top_k)?;

        match results.first() {
            Some(best) => tracing::info!(
                "Retrieved {} chunks (best score: {:.3}, from {:?})",
                results.len(),
                best.score,
                best.chunk.source_path
            ),
            None => tracing::info!("Retrieved no chunks"),
        }

        Ok(results)
    }
}
