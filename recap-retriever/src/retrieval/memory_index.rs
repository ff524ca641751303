//! Ephemeral in-memory vector index for a single retrieval call

use anyhow::Result;
use recap_context::Chunk;

/// One chunk paired with its embedding vector.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// A chunk returned from a similarity query, with its cosine score.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// In-memory vector index over the chunks of one retrieval call.
///
/// The index is immutable once built and supports exactly one access
/// pattern: a top-k cosine-similarity query. It is created at the start of a
/// retrieval call and dropped at its end; nothing persists across calls.
#[derive(Debug)]
pub struct MemoryVectorIndex {
    entries: Vec<IndexedEntry>,
    dimension: usize,
}

impl MemoryVectorIndex {
    /// Build an index from chunks and their embeddings (same order, same
    /// length). Fails if the counts differ or the vectors are not all of one
    /// dimension.
    pub fn build(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        anyhow::ensure!(
            chunks.len() == embeddings.len(),
            "chunk/embedding count mismatch: {} chunks, {} embeddings",
            chunks.len(),
            embeddings.len()
        );

        let dimension = embeddings.first().map(|e| e.len()).unwrap_or(0);
        anyhow::ensure!(
            embeddings.iter().all(|e| e.len() == dimension),
            "embeddings have mixed dimensionality"
        );
        anyhow::ensure!(
            chunks.is_empty() || dimension > 0,
            "embeddings are zero-dimensional"
        );

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexedEntry { chunk, embedding })
            .collect();

        Ok(Self { entries, dimension })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Return the `k` entries most similar to `query`, in descending score
    /// order. Ties keep the original chunk order; `k` larger than the index
    /// is clamped; `k == 0` returns an empty result.
    pub fn query(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        if k == 0 || self.entries.is_empty() {
            return Ok(Vec::new());
        }
        anyhow::ensure!(
            query.len() == self.dimension,
            "query dimension {} does not match index dimension {}",
            query.len(),
            self.dimension
        );

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(query, &entry.embedding),
            })
            .collect();

        // Stable sort keeps the original chunk order for tied scores.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k.min(self.entries.len()));

        Ok(scored)
    }
}

/// Cosine similarity between two embedding vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x.powi(2)).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x.powi(2)).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: usize, content: &str) -> Chunk {
        Chunk {
            content: content.to_string(),
            index,
            source_offset: 0,
        }
    }

    fn sample_index() -> MemoryVectorIndex {
        MemoryVectorIndex::build(
            vec![chunk(0, "budget"), chunk(1, "staffing"), chunk(2, "schedule")],
            vec![
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn identical_vector_ranks_first_with_unit_score() {
        let index = sample_index();
        let results = index.query(&[0.0, 1.0, 0.0], 3).unwrap();

        assert_eq!(results[0].chunk.content, "staffing");
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn k_larger_than_index_returns_everything_in_score_order() {
        let index = sample_index();
        let results = index.query(&[0.9, 0.1, 0.0], 10).unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(results[0].chunk.content, "budget");
    }

    #[test]
    fn zero_k_returns_empty_not_error() {
        let index = sample_index();
        assert!(index.query(&[1.0, 0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn tied_scores_keep_original_chunk_order() {
        let index = MemoryVectorIndex::build(
            vec![chunk(0, "first"), chunk(1, "second"), chunk(2, "third")],
            vec![
                vec![1.0, 0.0],
                vec![1.0, 0.0],
                vec![1.0, 0.0],
            ],
        )
        .unwrap();

        let results = index.query(&[1.0, 0.0], 3).unwrap();
        let order: Vec<usize> = results.iter().map(|r| r.chunk.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn count_mismatch_is_rejected() {
        let result = MemoryVectorIndex::build(vec![chunk(0, "a")], vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn mixed_dimensions_are_rejected() {
        let result = MemoryVectorIndex::build(
            vec![chunk(0, "a"), chunk(1, "b")],
            vec![vec![1.0, 0.0], vec![1.0]],
        );
        assert!(result.is_err());
    }

    #[test]
    fn query_dimension_mismatch_is_an_error() {
        let index = sample_index();
        assert!(index.query(&[1.0, 0.0], 3).is_err());
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }
}
