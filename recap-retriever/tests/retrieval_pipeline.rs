//! End-to-end tests for the retrieval pipeline with deterministic embedders.

use async_trait::async_trait;
use recap_embed::{EmbedError, EmbeddingProvider, EmbeddingResult};
use recap_retriever::{RetrievalConfig, RetrievalEngine};
use std::sync::Arc;
use tracing_test::traced_test;

/// Deterministic embedder: one dimension per keyword (occurrence count) plus
/// a constant baseline so no vector is ever zero. Texts mentioning a keyword
/// score higher against an instruction mentioning the same keyword.
struct KeywordEmbedProvider {
    keywords: Vec<&'static str>,
}

impl KeywordEmbedProvider {
    fn new(keywords: Vec<&'static str>) -> Self {
        Self { keywords }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let mut vector: Vec<f32> = self
            .keywords
            .iter()
            .map(|kw| lowered.matches(kw).count() as f32)
            .collect();
        vector.push(1.0);
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedProvider {
    async fn embed_text(&self, text: &str) -> recap_embed::Result<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    async fn embed_texts(&self, texts: &[String]) -> recap_embed::Result<EmbeddingResult> {
        Ok(EmbeddingResult::new(
            texts.iter().map(|t| self.vectorize(t)).collect(),
        ))
    }

    fn provider_name(&self) -> &str {
        "keyword-test"
    }
}

/// Embedder that is always down, for exercising the fallback path.
struct FailingEmbedProvider;

#[async_trait]
impl EmbeddingProvider for FailingEmbedProvider {
    async fn embed_text(&self, _text: &str) -> recap_embed::Result<Vec<f32>> {
        Err(EmbedError::unavailable("embedding service offline"))
    }

    async fn embed_texts(&self, _texts: &[String]) -> recap_embed::Result<EmbeddingResult> {
        Err(EmbedError::unavailable("embedding service offline"))
    }

    fn provider_name(&self) -> &str {
        "failing-test"
    }
}

fn keyword_engine(config: RetrievalConfig) -> RetrievalEngine {
    let provider = Arc::new(KeywordEmbedProvider::new(vec!["budget", "staffing"]));
    RetrievalEngine::new(config, provider).unwrap()
}

const THREE_PARAGRAPHS: &str = "Paragraph one.\n\nParagraph two about budgets.\n\nParagraph three about staffing.";

#[tokio::test]
async fn short_text_degenerates_to_full_text_excerpt() {
    // The whole text fits in one chunk, so retrieval returns that chunk.
    let engine = keyword_engine(RetrievalConfig::default());
    let context = engine.retrieve(THREE_PARAGRAPHS, "budget").await;

    assert_eq!(context.excerpt, THREE_PARAGRAPHS);
    assert_eq!(context.full_text, THREE_PARAGRAPHS);
}

#[tokio::test]
async fn top_k_beyond_chunk_count_returns_all_chunks() {
    // Small chunks force one chunk per paragraph; top_k 5 > 3 chunks.
    let engine = keyword_engine(
        RetrievalConfig::default()
            .with_chunk_size(40)
            .with_chunk_overlap(0)
            .with_top_k(5),
    );
    let context = engine.retrieve(THREE_PARAGRAPHS, "budget").await;

    assert!(context.excerpt.contains("Paragraph one."));
    assert!(context.excerpt.contains("budgets"));
    assert!(context.excerpt.contains("staffing"));
    assert_eq!(context.excerpt.matches("\n\n---\n\n").count(), 2);
    assert_eq!(context.full_text, THREE_PARAGRAPHS);
}

#[tokio::test]
async fn custom_excerpt_delimiter_separates_sections() {
    let engine = keyword_engine(
        RetrievalConfig::default()
            .with_chunk_size(40)
            .with_chunk_overlap(0)
            .with_excerpt_delimiter("\n===\n"),
    );
    let context = engine.retrieve(THREE_PARAGRAPHS, "budget").await;

    assert_eq!(context.excerpt.matches("\n===\n").count(), 2);
    assert!(!context.excerpt.contains("---"));
}

#[tokio::test]
async fn excerpt_sections_appear_in_descending_similarity_order() {
    let engine = keyword_engine(
        RetrievalConfig::default()
            .with_chunk_size(40)
            .with_chunk_overlap(0),
    );
    let context = engine.retrieve(THREE_PARAGRAPHS, "budget").await;

    let budget_at = context.excerpt.find("budgets").unwrap();
    let staffing_at = context.excerpt.find("staffing").unwrap();
    assert!(
        budget_at < staffing_at,
        "the budget paragraph should be ranked above the staffing one"
    );
}

#[tokio::test]
async fn most_relevant_chunk_wins_with_top_k_one() {
    let engine = keyword_engine(
        RetrievalConfig::default()
            .with_chunk_size(40)
            .with_chunk_overlap(0)
            .with_top_k(1),
    );
    let context = engine.retrieve(THREE_PARAGRAPHS, "staffing").await;

    assert!(context.excerpt.contains("staffing"));
    assert!(!context.excerpt.contains("budgets"));
}

#[traced_test]
#[tokio::test]
async fn embedding_failure_falls_back_to_full_text() {
    let engine =
        RetrievalEngine::new(RetrievalConfig::default(), Arc::new(FailingEmbedProvider)).unwrap();
    let context = engine.retrieve(THREE_PARAGRAPHS, "budget").await;

    assert_eq!(context.excerpt, THREE_PARAGRAPHS);
    assert_eq!(context.full_text, THREE_PARAGRAPHS);
    assert!(logs_contain("falling back to full text"));
}

#[tokio::test]
async fn empty_text_short_circuits_without_running_the_pipeline() {
    // The failing provider proves the pipeline is never invoked.
    let engine =
        RetrievalEngine::new(RetrievalConfig::default(), Arc::new(FailingEmbedProvider)).unwrap();

    let context = engine.retrieve("", "budget").await;
    assert_eq!(context.excerpt, "");
    assert_eq!(context.full_text, "");
}

#[tokio::test]
async fn empty_instruction_short_circuits_with_full_text_preserved() {
    let engine = keyword_engine(RetrievalConfig::default());
    let context = engine.retrieve(THREE_PARAGRAPHS, "").await;

    assert_eq!(context.excerpt, "");
    assert_eq!(context.full_text, THREE_PARAGRAPHS);
}

#[tokio::test]
async fn zero_top_k_falls_back_to_full_text() {
    let engine = keyword_engine(RetrievalConfig::default().with_top_k(0));
    let context = engine.retrieve(THREE_PARAGRAPHS, "budget").await;

    assert_eq!(context.excerpt, THREE_PARAGRAPHS);
}

#[test]
fn overlap_not_smaller_than_chunk_size_fails_at_construction() {
    let provider = Arc::new(KeywordEmbedProvider::new(vec!["budget"]));
    let result = RetrievalEngine::new(
        RetrievalConfig::default()
            .with_chunk_size(100)
            .with_chunk_overlap(100),
        provider,
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn concurrent_retrievals_share_no_state() {
    let engine = Arc::new(keyword_engine(
        RetrievalConfig::default()
            .with_chunk_size(40)
            .with_chunk_overlap(0)
            .with_top_k(1),
    ));

    let budget = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.retrieve(THREE_PARAGRAPHS, "budget").await })
    };
    let staffing = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.retrieve(THREE_PARAGRAPHS, "staffing").await })
    };

    let (budget, staffing) = (budget.await.unwrap(), staffing.await.unwrap());
    assert!(budget.excerpt.contains("budgets"));
    assert!(staffing.excerpt.contains("staffing"));
}

#[tokio::test]
async fn long_transcript_yields_bounded_excerpt() {
    let sentence = "Routine status update with nothing of note. ";
    let mut text = sentence.repeat(80);
    text.push_str("The budget overrun was finally approved by the board. ");
    text.push_str(&sentence.repeat(80));

    let engine = keyword_engine(RetrievalConfig::default());
    let context = engine.retrieve(&text, "what happened with the budget?").await;

    assert!(context.excerpt.contains("budget overrun"));
    assert!(
        context.excerpt.len() < text.len(),
        "excerpt should be a bounded selection, not the whole transcript"
    );
    assert_eq!(context.full_text, text);
}
