//! Provider error types.
//!
//! Classifies HTTP failures from hosted-model APIs before they fold into
//! the core `ScoringError` taxonomy tagged with the failing stage.

use thiserror::Error;

use quizcraft_core::error::ScoringError;

/// Errors that can occur when interacting with a hosted-model provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Fold into the core taxonomy as an embedding-stage failure.
    pub fn into_embedding_error(self) -> ScoringError {
        ScoringError::EmbeddingUnavailable(self.to_string())
    }

    /// Fold into the core taxonomy as a generation-stage failure.
    pub fn into_generation_error(self) -> ScoringError {
        ScoringError::GenerationUnavailable(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_into_the_failing_stage() {
        let embed = ProviderError::Timeout(30).into_embedding_error();
        assert_eq!(embed.stage(), "embedding");
        assert!(embed.to_string().contains("timed out"));

        let gen = ProviderError::AuthenticationFailed("bad key".into()).into_generation_error();
        assert_eq!(gen.stage(), "generation");
    }
}
