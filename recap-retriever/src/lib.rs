//! recap-retriever: retrieval-augmented context construction
//!
//! Given a long transcript and a natural-language instruction, this crate
//! segments the transcript into overlapping chunks, embeds them through a
//! pluggable provider, ranks them against the instruction with an ephemeral
//! in-memory cosine-similarity index, and assembles the top matches into a
//! bounded excerpt returned alongside the unmodified full text.
//!
//! The pipeline is availability-first: if any step fails, the caller still
//! gets the full text as the excerpt rather than an error, so a downstream
//! summarization step always has usable context.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use recap_retriever::{RetrievalConfig, RetrievalEngine};
//! use recap_embed::GeminiEmbedProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = Arc::new(GeminiEmbedProvider::from_env()?);
//! let engine = RetrievalEngine::new(RetrievalConfig::default(), provider)?;
//!
//! let context = engine
//!     .retrieve("...long transcript...", "summarize the budget discussion")
//!     .await;
//! println!("{}", context.excerpt);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! (text, instruction) → TextSplitter → EmbeddingProvider (batch)
//!                                          ↓
//!     excerpt + full text ← top-k query ← MemoryVectorIndex
//! ```

pub mod retrieval;

pub use retrieval::engine::{RetrievalConfig, RetrievalEngine, RetrievedContext};
pub use retrieval::memory_index::{IndexedEntry, MemoryVectorIndex, ScoredChunk};
