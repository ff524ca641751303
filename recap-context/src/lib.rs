pub mod splitter;

// Re-export the main splitting types for external use
pub use splitter::{Chunk, DEFAULT_SEPARATORS, SplitConfig, SplitError, TextSplitter};
