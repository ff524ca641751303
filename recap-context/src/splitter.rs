//! Recursive character splitting for long transcripts.
//!
//! The splitter partitions a text into ordered, overlapping chunks so each
//! chunk fits an embedding model's input budget while keeping enough trailing
//! context from its predecessor that a sentence cut at a chunk boundary is
//! still retrievable. Splitting tries a prioritized list of separators, from
//! paragraph breaks down to single spaces, and falls back to a hard character
//! cut only when no separator can produce a small enough fragment.
//!
//! Every chunk is a contiguous slice of the source text with its starting
//! offset recorded, so concatenating chunks with the overlap stripped
//! reconstructs the input exactly:
//!
//! ```
//! use recap_context::{SplitConfig, TextSplitter};
//!
//! let splitter = TextSplitter::new(
//!     SplitConfig::default().with_chunk_size(40).with_chunk_overlap(10),
//! )
//! .unwrap();
//!
//! let text = "First point about budgets. Second point about staffing. Third point.";
//! let chunks = splitter.split(text);
//! assert!(chunks.len() > 1);
//!
//! let mut reconstructed = String::new();
//! let mut covered = 0;
//! for chunk in &chunks {
//!     reconstructed.push_str(&chunk.content[covered - chunk.source_offset..]);
//!     covered = chunk.source_offset + chunk.content.len();
//! }
//! assert_eq!(reconstructed, text);
//! ```

use serde::Serialize;
use std::collections::VecDeque;
use std::ops::Range;

/// Separator priority for transcript text, coarsest first. The trailing empty
/// string means "hard cut at the chunk size" once everything else has failed.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ".", "!", "?", ",", " ", ""];

/// Error raised when the splitter is configured with unusable parameters.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// The configuration cannot produce valid chunks (e.g. overlap >= size).
    #[error("invalid splitter configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl SplitError {
    pub fn invalid_configuration<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Configuration for [`TextSplitter`].
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Number of trailing characters of one chunk repeated at the start of
    /// the next, where fragment boundaries allow.
    pub chunk_overlap: usize,
    /// Separators tried coarsest to finest; an empty string hard-cuts.
    pub separators: Vec<String>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SplitConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    pub fn with_separators(mut self, separators: Vec<String>) -> Self {
        self.separators = separators;
        self
    }

    /// Validate the configuration before any splitting work starts.
    pub fn validate(&self) -> Result<(), SplitError> {
        if self.chunk_size == 0 {
            return Err(SplitError::invalid_configuration("chunk_size must be > 0"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(SplitError::invalid_configuration(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// One ordered fragment of the source text.
#[derive(Debug, Clone, Serialize)]
pub struct Chunk {
    /// The chunk text, a contiguous slice of the source.
    pub content: String,
    /// Zero-based position in the emitted sequence.
    pub index: usize,
    /// Byte offset of `content` within the source text.
    pub source_offset: usize,
}

/// Splits text into overlapping chunks using a prioritized separator list.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    config: SplitConfig,
}

impl TextSplitter {
    /// Create a splitter, failing fast on an invalid configuration.
    pub fn new(config: SplitConfig) -> Result<Self, SplitError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Split `text` into ordered chunks of at most `chunk_size` characters,
    /// each chunk after the first starting with up to `chunk_overlap`
    /// trailing characters of its predecessor. Empty input yields no chunks.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let mut fragments = Vec::new();
        self.collect_fragments(text, 0, 0, &mut fragments);
        self.merge_fragments(text, fragments)
    }

    // Recursively cuts `text` (at byte offset `base` in the source) into
    // fragments no longer than chunk_size, trying separators in priority
    // order. Fragments keep their separator so no characters are lost.
    fn collect_fragments(
        &self,
        text: &str,
        base: usize,
        separator_idx: usize,
        out: &mut Vec<Range<usize>>,
    ) {
        if text.is_empty() {
            return;
        }
        if char_len(text) <= self.config.chunk_size {
            out.push(base..base + text.len());
            return;
        }

        let separator = match self.config.separators.get(separator_idx) {
            Some(s) if !s.is_empty() => s.as_str(),
            // Separators exhausted (or explicit hard-cut separator).
            _ => {
                self.hard_cut(text, base, out);
                return;
            }
        };

        let mut pieces: Vec<Range<usize>> = Vec::new();
        let mut start = 0;
        for (pos, matched) in text.match_indices(separator) {
            let end = pos + matched.len();
            pieces.push(start..end);
            start = end;
        }
        if pieces.is_empty() {
            // Separator absent; try the next, finer one.
            self.collect_fragments(text, base, separator_idx + 1, out);
            return;
        }
        if start < text.len() {
            pieces.push(start..text.len());
        }

        for piece in pieces {
            let piece_text = &text[piece.clone()];
            if char_len(piece_text) <= self.config.chunk_size {
                out.push(base + piece.start..base + piece.end);
            } else {
                self.collect_fragments(piece_text, base + piece.start, separator_idx + 1, out);
            }
        }
    }

    // Last resort: no separator fits, so cut into small pieces on char
    // boundaries and let the merge pass assemble the chunks. Pieces are sized
    // to the overlap so the retained window can carry it across chunks.
    fn hard_cut(&self, text: &str, base: usize, out: &mut Vec<Range<usize>>) {
        let piece_chars = if self.config.chunk_overlap > 0 {
            self.config.chunk_overlap
        } else {
            self.config.chunk_size
        };
        let mut start = 0;
        let mut count = 0;
        for (byte_idx, _) in text.char_indices() {
            if count == piece_chars {
                out.push(base + start..base + byte_idx);
                start = byte_idx;
                count = 0;
            }
            count += 1;
        }
        if start < text.len() {
            out.push(base + start..base + text.len());
        }
    }

    // Greedily packs fragments into chunks. When a chunk fills up it is
    // emitted, and trailing fragments totalling at most chunk_overlap
    // characters are retained as the start of the next chunk.
    fn merge_fragments(&self, text: &str, fragments: Vec<Range<usize>>) -> Vec<Chunk> {
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut window: VecDeque<(Range<usize>, usize)> = VecDeque::new();
        let mut window_chars = 0usize;

        for fragment in fragments {
            let fragment_chars = char_len(&text[fragment.clone()]);
            if !window.is_empty() && window_chars + fragment_chars > self.config.chunk_size {
                Self::emit(&mut chunks, text, &window);
                while !window.is_empty()
                    && (window_chars > self.config.chunk_overlap
                        || window_chars + fragment_chars > self.config.chunk_size)
                {
                    let (_, dropped) = window.pop_front().expect("window is non-empty");
                    window_chars -= dropped;
                }
            }
            window.push_back((fragment, fragment_chars));
            window_chars += fragment_chars;
        }
        if !window.is_empty() {
            Self::emit(&mut chunks, text, &window);
        }

        chunks
    }

    fn emit(chunks: &mut Vec<Chunk>, text: &str, window: &VecDeque<(Range<usize>, usize)>) {
        let start = window.front().expect("window is non-empty").0.start;
        let end = window.back().expect("window is non-empty").0.end;
        chunks.push(Chunk {
            content: text[start..end].to_string(),
            index: chunks.len(),
            source_offset: start,
        });
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
