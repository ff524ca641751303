//! Retrieval orchestration with degraded-mode fallback

use crate::retrieval::memory_index::MemoryVectorIndex;
use anyhow::Result;
use recap_context::{DEFAULT_SEPARATORS, SplitConfig, SplitError, TextSplitter};
use recap_embed::EmbeddingProvider;
use serde::Serialize;
use std::sync::Arc;

/// Configuration for the retrieval pipeline.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Overlap carried between adjacent chunks, in characters.
    pub chunk_overlap: usize,
    /// Number of chunks retrieved for the excerpt.
    pub top_k: usize,
    /// Separator priority list for segmentation.
    pub separators: Vec<String>,
    /// Delimiter inserted between excerpt sections.
    pub excerpt_delimiter: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 5,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            excerpt_delimiter: "\n\n---\n\n".to_string(),
        }
    }
}

impl RetrievalConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    pub fn with_excerpt_delimiter<S: Into<String>>(mut self, delimiter: S) -> Self {
        self.excerpt_delimiter = delimiter.into();
        self
    }
}

/// The outcome of one retrieval call: the most relevant excerpt and the
/// unmodified source text, for interpolation into a downstream prompt.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedContext {
    /// Top-ranked chunks joined with the excerpt delimiter, or the full text
    /// when retrieval was degraded, or empty when there was no input.
    pub excerpt: String,
    /// The source text, always returned unmodified.
    pub full_text: String,
}

/// Orchestrates segment → embed → index → rank → excerpt for one text and
/// instruction pair.
///
/// Retrieval is strictly an optimization layer: any failure in segmentation,
/// embedding, or indexing degrades to returning the full text as the excerpt
/// instead of surfacing an error. Only an invalid configuration is reported,
/// and that happens at construction, before any work starts.
///
/// Every call builds its own chunks, vectors, and index and discards them on
/// return; concurrent calls share nothing mutable.
pub struct RetrievalEngine {
    config: RetrievalConfig,
    splitter: TextSplitter,
    provider: Arc<dyn EmbeddingProvider>,
}

impl RetrievalEngine {
    /// Create an engine, failing fast on an invalid chunking configuration.
    pub fn new(
        config: RetrievalConfig,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, SplitError> {
        let splitter = TextSplitter::new(
            SplitConfig::default()
                .with_chunk_size(config.chunk_size)
                .with_chunk_overlap(config.chunk_overlap)
                .with_separators(config.separators.clone()),
        )?;
        Ok(Self {
            config,
            splitter,
            provider,
        })
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Retrieve the most relevant excerpt of `text` for `instruction`.
    ///
    /// Empty text or instruction short-circuits to an empty excerpt; any
    /// pipeline failure falls back to the full text. This method never fails.
    pub async fn retrieve(&self, text: &str, instruction: &str) -> RetrievedContext {
        if text.is_empty() || instruction.is_empty() {
            return RetrievedContext {
                excerpt: String::new(),
                full_text: text.to_string(),
            };
        }

        let excerpt = match self.build_excerpt(text, instruction).await {
            Ok(excerpt) => excerpt,
            Err(error) => {
                tracing::warn!(
                    provider = self.provider.provider_name(),
                    %error,
                    "retrieval failed, falling back to full text"
                );
                text.to_string()
            }
        };

        RetrievedContext {
            excerpt,
            full_text: text.to_string(),
        }
    }

    async fn build_excerpt(&self, text: &str, instruction: &str) -> Result<String> {
        let chunks = self.splitter.split(text);
        anyhow::ensure!(!chunks.is_empty(), "segmentation produced no chunks");
        tracing::debug!(chunks = chunks.len(), "transcript segmented");

        let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embedded = self.provider.embed_texts(&contents).await?;
        let index = MemoryVectorIndex::build(chunks, embedded.embeddings)?;

        let query = self.provider.embed_text(instruction).await?;
        let matches = index.query(&query, self.config.top_k)?;
        anyhow::ensure!(!matches.is_empty(), "similarity search returned no chunks");
        tracing::debug!(
            matched = matches.len(),
            top_score = matches[0].score,
            "relevant chunks selected"
        );

        Ok(matches
            .iter()
            .map(|m| m.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join(&self.config.excerpt_delimiter))
    }
}
