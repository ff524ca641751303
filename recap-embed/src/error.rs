//! Error types for the embedding capability boundary

/// Result type for embedding operations.
pub type Result<T> = std::result::Result<T, EmbedError>;

/// Errors raised by embedding providers.
///
/// Only [`EmbedError::InvalidConfig`] is fatal; it is raised synchronously at
/// provider construction, before any retrieval work starts. Every other
/// variant means the provider is currently unavailable (network failure,
/// rate limiting, malformed response) and callers are expected to degrade
/// gracefully rather than propagate it.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// The provider configuration is unusable (missing API key, empty model).
    #[error("invalid embedding configuration: {message}")]
    InvalidConfig { message: String },

    /// The provider could not produce embeddings right now.
    #[error("embedding provider unavailable: {message}")]
    Unavailable { message: String },

    /// The HTTP request to the provider failed.
    #[error("embedding request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
}

impl EmbedError {
    /// Create an invalid configuration error with a custom message.
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unavailability error with a custom message.
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Whether the failure is transient and should trigger degraded-mode
    /// fallback instead of surfacing to the caller.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidConfig { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_fatal_everything_else_recoverable() {
        assert!(!EmbedError::invalid_config("no api key").is_recoverable());
        assert!(EmbedError::unavailable("rate limited").is_recoverable());
    }
}
