//! The embedding capability boundary consumed by the retrieval pipeline

use crate::error::Result;
use async_trait::async_trait;

/// Result of embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingResult {
    /// The generated embeddings, one per input text, in input order
    pub embeddings: Vec<Vec<f32>>,
    /// The dimension of each embedding vector
    pub dimension: usize,
}

impl EmbeddingResult {
    /// Create a new embedding result, inferring the dimension from the first
    /// vector (0 when empty).
    pub fn new(embeddings: Vec<Vec<f32>>) -> Self {
        let dimension = embeddings.first().map(|e| e.len()).unwrap_or(0);
        Self {
            embeddings,
            dimension,
        }
    }

    /// Number of embedding vectors in this result.
    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    /// Whether this result contains no embedding vectors.
    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    /// Whether every vector shares the dimension inferred at construction.
    pub fn is_uniform(&self) -> bool {
        self.embeddings.iter().all(|e| e.len() == self.dimension)
    }
}

/// Trait for embedding providers that map text to fixed-dimension vectors.
///
/// Providers are consumed purely as a capability: the retrieval pipeline does
/// not care how vectors are produced, only that `embed_texts` is
/// order-preserving (one vector per input, same index) and that all vectors
/// produced within one session share a dimensionality.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, preserving input order.
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult>;

    /// Name/identifier of this provider, for logging.
    fn provider_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_infers_dimension() {
        let result = EmbeddingResult::new(vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]]);
        assert_eq!(result.len(), 2);
        assert_eq!(result.dimension, 3);
        assert!(!result.is_empty());
        assert!(result.is_uniform());
    }

    #[test]
    fn empty_result_has_zero_dimension() {
        let result = EmbeddingResult::new(vec![]);
        assert!(result.is_empty());
        assert_eq!(result.dimension, 0);
    }

    #[test]
    fn mixed_dimensions_are_detected() {
        let result = EmbeddingResult::new(vec![vec![0.1, 0.2], vec![0.3]]);
        assert!(!result.is_uniform());
    }
}
