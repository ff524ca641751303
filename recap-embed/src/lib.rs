//! # recap-embed
//!
//! The embedding capability boundary for the recap retrieval pipeline:
//! a provider trait that maps text to fixed-dimension vectors, plus an HTTP
//! adapter for the Gemini embedding API.
//!
//! The retrieval pipeline consumes [`EmbeddingProvider`] purely as an
//! interface, so any backend can be substituted without touching
//! segmentation or indexing. The contract is small:
//!
//! - `embed_texts` is order-preserving: one vector per input, same index.
//! - All vectors produced within one provider session share a dimension.
//! - Any provider failure other than misconfiguration is reported as
//!   recoverable ([`EmbedError::is_recoverable`]) and must trigger the
//!   caller's degraded-mode fallback, never a hard error.
//!
//! ## Quick Start
//!
//! ```no_run
//! use recap_embed::{EmbeddingProvider, GeminiEmbedProvider, RemoteEmbedConfig};
//!
//! # async fn example() -> recap_embed::Result<()> {
//! let provider = GeminiEmbedProvider::new(RemoteEmbedConfig::new("api-key"))?;
//!
//! let texts = vec!["budget review".to_string(), "staffing plan".to_string()];
//! let result = provider.embed_texts(&texts).await?;
//! println!("{} embeddings of dimension {}", result.len(), result.dimension);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod provider;
pub mod remote;

// Re-export main types for easy access
pub use config::RemoteEmbedConfig;
pub use error::{EmbedError, Result};
pub use provider::{EmbeddingProvider, EmbeddingResult};
pub use remote::GeminiEmbedProvider;
