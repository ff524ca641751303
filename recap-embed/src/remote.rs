//! HTTP embedding provider for the Gemini `embedContent` API

use crate::config::RemoteEmbedConfig;
use crate::error::{EmbedError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The batchEmbedContents endpoint accepts at most this many texts per call.
const MAX_BATCH_SIZE: usize = 100;

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
struct ContentPayload {
    parts: Vec<TextPart>,
}

impl ContentPayload {
    fn from_text(text: &str) -> Self {
        Self {
            parts: vec![TextPart {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize)]
struct EmbedContentRequest {
    content: ContentPayload,
}

#[derive(Serialize)]
struct BatchEmbedItem {
    model: String,
    content: ContentPayload,
}

#[derive(Serialize)]
struct BatchEmbedRequest {
    requests: Vec<BatchEmbedItem>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

/// Embedding provider backed by the Gemini REST API.
///
/// Batches are issued as single `batchEmbedContents` requests (split at the
/// provider's 100-item cap), so one retrieval call makes one network round
/// trip per hundred chunks plus one for the instruction.
#[derive(Debug, Clone)]
pub struct GeminiEmbedProvider {
    config: RemoteEmbedConfig,
    client: reqwest::Client,
}

impl GeminiEmbedProvider {
    /// Create a provider, failing fast on an unusable configuration.
    pub fn new(config: RemoteEmbedConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    /// Create a provider from environment variables (see
    /// [`RemoteEmbedConfig::from_env`]).
    pub fn from_env() -> Result<Self> {
        Self::new(RemoteEmbedConfig::from_env()?)
    }

    fn endpoint(&self, verb: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            verb
        )
    }

    async fn post_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| BatchEmbedItem {
                    model: format!("models/{}", self.config.model),
                    content: ContentPayload::from_text(text),
                })
                .collect(),
        };

        let response = self
            .client
            .post(self.endpoint("batchEmbedContents"))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmbedError::unavailable(format!(
                "provider returned HTTP {status}"
            )));
        }

        let body: BatchEmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::unavailable(format!("malformed embedding response: {e}")))?;

        if body.embeddings.len() != texts.len() {
            return Err(EmbedError::unavailable(format!(
                "provider returned {} embeddings for {} inputs",
                body.embeddings.len(),
                texts.len()
            )));
        }

        Ok(body.embeddings.into_iter().map(|e| e.values).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiEmbedProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedContentRequest {
            content: ContentPayload::from_text(text),
        };

        let response = self
            .client
            .post(self.endpoint("embedContent"))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EmbedError::unavailable(format!(
                "provider returned HTTP {status}"
            )));
        }

        let body: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::unavailable(format!("malformed embedding response: {e}")))?;

        Ok(body.embedding.values)
    }

    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult> {
        if texts.is_empty() {
            return Ok(EmbeddingResult::new(vec![]));
        }

        tracing::debug!(count = texts.len(), "requesting embeddings");

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(MAX_BATCH_SIZE) {
            all_embeddings.extend(self.post_batch(batch).await?);
        }

        let result = EmbeddingResult::new(all_embeddings);
        if !result.is_uniform() {
            return Err(EmbedError::unavailable(
                "provider returned embeddings of mixed dimensionality",
            ));
        }

        tracing::debug!(
            count = result.len(),
            dimension = result.dimension,
            "embeddings received"
        );
        Ok(result)
    }

    fn provider_name(&self) -> &str {
        "gemini"
    }
}
