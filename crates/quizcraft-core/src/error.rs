//! Scoring error taxonomy.
//!
//! These error types represent failures in the submission pipeline and its
//! collaborators. The pipeline never catches or retries them; they propagate
//! to the caller, and each variant identifies the stage that failed so
//! callers can report it without string matching.

use thiserror::Error;

/// Errors that can occur while scoring a submission.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Malformed input: mismatched embedding dimensions, zero vectors,
    /// unparseable model output.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The external embedding call failed, timed out, or returned
    /// unparseable data.
    #[error("embedding service unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// The external text-generation call failed or returned unparseable data.
    #[error("text generation unavailable: {0}")]
    GenerationUnavailable(String),

    /// The answer store is unreachable or a write failed unexpectedly.
    #[error("answer store unavailable: {0}")]
    StorageUnavailable(String),

    /// A required record or assignment is missing. Catalog and store reads
    /// express ordinary misses as `Ok(None)`; this variant is for callers
    /// that require presence.
    #[error("not found: {0}")]
    NotFound(String),
}

impl ScoringError {
    /// Name of the pipeline stage that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            ScoringError::InvalidInput(_) => "input",
            ScoringError::EmbeddingUnavailable(_) => "embedding",
            ScoringError::GenerationUnavailable(_) => "generation",
            ScoringError::StorageUnavailable(_) => "storage",
            ScoringError::NotFound(_) => "lookup",
        }
    }

    /// Returns `true` if resubmitting the same answer could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ScoringError::EmbeddingUnavailable(_)
                | ScoringError::GenerationUnavailable(_)
                | ScoringError::StorageUnavailable(_)
        )
    }
}
