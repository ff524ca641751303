//! Configuration for the remote embedding provider

use crate::error::{EmbedError, Result};
use std::env;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "embedding-001";

/// Configuration for a remote embedding endpoint.
#[derive(Clone)]
pub struct RemoteEmbedConfig {
    /// Base URL of the embedding API.
    pub api_base: String,
    /// Name of the embedding model to request.
    pub model: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for RemoteEmbedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteEmbedConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RemoteEmbedConfig {
    /// Create a configuration for the default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Load the configuration from the environment: `GEMINI_API_KEY`
    /// (required), `GEMINI_EMBED_MODEL` and `GEMINI_API_BASE` (optional).
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| EmbedError::invalid_config("GEMINI_API_KEY is not set"))?;
        let mut config = Self::new(api_key);
        if let Ok(model) = env::var("GEMINI_EMBED_MODEL") {
            config.model = model;
        }
        if let Ok(api_base) = env::var("GEMINI_API_BASE") {
            config.api_base = api_base;
        }
        config.validate()?;
        Ok(config)
    }

    /// Set the API base URL (builder style).
    pub fn with_api_base<S: Into<String>>(mut self, api_base: S) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set the embedding model (builder style).
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    /// Set the per-request timeout (builder style).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate that the configuration can be used to issue requests.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(EmbedError::invalid_config("api_key must not be empty"));
        }
        if self.model.is_empty() {
            return Err(EmbedError::invalid_config("model must not be empty"));
        }
        if self.api_base.is_empty() {
            return Err(EmbedError::invalid_config("api_base must not be empty"));
        }
        Ok(())
    }
}
