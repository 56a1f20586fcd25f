//! Tests for retrieval ranking correctness.

use crate::chunk::{Chunk, ChunkConfig, ChunkSplitter};
use crate::embeddings::{Embedder, MockProvider};
use crate::progress::ProgressReporter;
use crate::rag::Retriever;
use crate::types::Document;
use crate::vector_index::{FlatIndex, VectorIndex};
use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to create a normalized embedding.
    fn normalize(v: &[f32]) -> Vec<f32> {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter().map(|x| x / norm).collect()
        } else {
            v.to_vec()
        }
    }

    fn debate_chunks() -> Vec<Chunk> {
        let document = Document::new(
            "motion.txt",
            "Cars pollute city air.\n\
             Bicycles need safe lanes.\n\
             Public transit moves more people.\n\
             Cooking pasta takes ten minutes.\n",
        );
        let splitter = ChunkSplitter::new(ChunkConfig::new(40, 0).unwrap()).unwrap();
        splitter.split(&document).collect()
    }

    #[test]
    fn test_relevant_chunk_ranks_first() {
        let chunks = debate_chunks();
        assert_eq!(chunks.len(), 4);

        let index = FlatIndex::build(
            chunks,
            vec![
                normalize(&[1.0, 0.5, 0.2, 0.1]),
                normalize(&[0.6, 0.9, 0.1, 0.0]),
                normalize(&[0.5, 0.5, 0.5, 0.0]),
                normalize(&[-0.3, -0.8, 0.4, -0.2]),
            ],
        )
        .unwrap();

        let results = index.search(&normalize(&[0.9, 0.4, 0.3, 0.1]), 4).unwrap();

        assert_eq!(results.len(), 4);
        assert!(results[0].chunk.text.starts_with("Cars pollute"));
        assert!(results[3].chunk.text.starts_with("Cooking pasta"));
        assert!(results[0].score > 0.9);
        assert!(results[3].score < 0.0);
    }

    #[test]
    fn test_distances_nondecreasing_and_bounded_by_k() {
        let chunks = debate_chunks();
        let embeddings = vec![
            normalize(&[0.1, 0.9, 0.0]),
            normalize(&[0.7, 0.2, 0.1]),
            normalize(&[0.4, 0.4, 0.4]),
            normalize(&[0.9, 0.0, 0.1]),
        ];
        let index = FlatIndex::build(chunks, embeddings).unwrap();
        let query = normalize(&[1.0, 0.1, 0.0]);

        for k in 0..6 {
            let results = index.search(&query, k).unwrap();
            assert!(results.len() <= k);
            assert_eq!(results.len(), k.min(4));
            assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
        }
    }

    #[test]
    fn test_identical_queries_identical_order() {
        let index = FlatIndex::build(
            debate_chunks(),
            vec![
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![0.5, 0.5],
            ],
        )
        .unwrap();

        let first: Vec<String> = index
            .search(&[1.0, 0.2], 4)
            .unwrap()
            .into_iter()
            .map(|r| r.chunk.id)
            .collect();
        for _ in 0..10 {
            let again: Vec<String> = index
                .search(&[1.0, 0.2], 4)
                .unwrap()
                .into_iter()
                .map(|r| r.chunk.id)
                .collect();
            assert_eq!(first, again);
        }

        // Chunks 0 and 2 tie; insertion order decides.
        let positions: Vec<u32> = index
            .search(&[1.0, 0.0], 2)
            .unwrap()
            .iter()
            .map(|r| r.chunk.position)
            .collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[tokio::test]
    async fn test_retriever_with_mock_embeddings() {
        let chunks = debate_chunks();
        let embedder = Embedder::new(Arc::new(MockProvider::new(1024)), 16, Duration::from_secs(5));
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder
            .embed_texts(&texts, &ProgressReporter::noop())
            .await
            .unwrap();

        let index = FlatIndex::build(chunks, embeddings).unwrap();
        let retriever = Retriever::new(embedder, Arc::new(index), 2);

        let results = retriever.retrieve("How long does pasta take?").await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].chunk.text.contains("pasta"));
    }
}
