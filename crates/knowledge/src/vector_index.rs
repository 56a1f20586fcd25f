//! In-memory vector index over corpus chunks.
//!
//! The index is built once from `(chunk, embedding)` pairs and never mutated
//! afterwards; a configuration change means building a new one.

use crate::chunk::Chunk;
use crate::types::ScoredChunk;
use podium_core::{AppError, AppResult};

/// Default number of chunks returned per query.
pub const DEFAULT_TOP_K: usize = 4;

/// Nearest-neighbour lookup by query embedding.
pub trait VectorIndex: Send + Sync {
    /// Return at most `k` chunks, nearest first by cosine distance.
    ///
    /// Equal distances keep insertion order, so identical inputs always
    /// produce identical output.
    fn search(&self, query_embedding: &[f32], k: usize) -> AppResult<Vec<ScoredChunk>>;

    /// Number of indexed chunks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension of the stored vectors.
    fn dimensions(&self) -> usize;
}

/// Exact (brute-force) cosine index.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    entries: Vec<(Chunk, Vec<f32>)>,
    dimensions: usize,
}

impl FlatIndex {
    /// Build the index in one batch.
    pub fn build(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> AppResult<Self> {
        if chunks.len() != embeddings.len() {
            return Err(AppError::EmbeddingService(format!(
                "Cannot index {} chunks with {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let dimensions = match embeddings.first() {
            Some(first) if !first.is_empty() => first.len(),
            Some(_) => {
                return Err(AppError::EmbeddingService(
                    "Embeddings must not be empty vectors".to_string(),
                ))
            }
            None => {
                return Err(AppError::CorpusLoad(
                    "Cannot build an index without chunks".to_string(),
                ))
            }
        };

        if let Some(pos) = embeddings.iter().position(|e| e.len() != dimensions) {
            return Err(AppError::EmbeddingService(format!(
                "Inconsistent embedding dimensions: chunk {} has {}, expected {}",
                pos,
                embeddings[pos].len(),
                dimensions
            )));
        }

        tracing::debug!(
            "Built flat index with {} vectors of dimension {}",
            chunks.len(),
            dimensions
        );

        Ok(Self {
            entries: chunks.into_iter().zip(embeddings).collect(),
            dimensions,
        })
    }

    /// Iterate over indexed chunks in insertion order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|(chunk, _)| chunk)
    }
}

impl VectorIndex for FlatIndex {
    fn search(&self, query_embedding: &[f32], k: usize) -> AppResult<Vec<ScoredChunk>> {
        if query_embedding.len() != self.dimensions {
            return Err(AppError::EmbeddingService(format!(
                "Query has dimension {}, index expects {}",
                query_embedding.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (_, embedding))| (i, cosine_similarity(query_embedding, embedding)))
            .collect();

        // Stable sort by ascending distance keeps insertion order on ties.
        scored.sort_by(|a, b| (1.0 - a.1).total_cmp(&(1.0 - b.1)));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| ScoredChunk {
                chunk: self.entries[i].0.clone(),
                score,
                distance: 1.0 - score,
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Cosine similarity; zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
