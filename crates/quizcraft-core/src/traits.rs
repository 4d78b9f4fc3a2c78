//! Core trait seams for hosted models, the answer store, and the catalog.
//!
//! The model traits are implemented by the `quizcraft-providers` crate; the
//! store traits by `quizcraft-store`. Keeping them here lets the pipeline be
//! tested with deterministic stubs instead of live network calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::model::{AnswerRecord, Assignment, LeaderboardEntry};

// ---------------------------------------------------------------------------
// Text embedding
// ---------------------------------------------------------------------------

/// Trait for external text-embedding backends.
///
/// `embed` converts arbitrary non-empty text into a fixed-dimension vector.
/// The output is not guaranteed bit-reproducible across calls; callers must
/// not assume exact determinism. Failures surface as
/// [`ScoringError::EmbeddingUnavailable`] and are never retried here.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Human-readable backend name (e.g. "openai").
    fn name(&self) -> &str;

    /// Embed one text into a numeric vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ScoringError>;
}

// ---------------------------------------------------------------------------
// Text generation
// ---------------------------------------------------------------------------

/// Trait for external text-generation backends, used by the authoring flow
/// (question generation) and answer feedback (suggestions).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name (e.g. "openai").
    fn name(&self) -> &str;

    /// Generate text from a prompt.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ScoringError>;
}

/// Request to generate text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gpt-4.1-mini").
    pub model: String,
    /// The main prompt.
    pub prompt: String,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Response from a text-generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response text.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

// ---------------------------------------------------------------------------
// Image generation
// ---------------------------------------------------------------------------

/// Trait for external image-generation backends, used to illustrate
/// assignments. Optional at every call site.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate a PNG image from a prompt.
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, ScoringError>;
}

// ---------------------------------------------------------------------------
// Answer record store
// ---------------------------------------------------------------------------

/// Outcome of a conditional upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertOutcome {
    /// Whether the stored record changed.
    pub updated: bool,
    /// The stored record after the operation.
    pub current: AnswerRecord,
}

/// Trait for the per-student-per-question best-answer store.
///
/// Implementations must make `upsert_if_better` a single atomic
/// read-modify-write per key: two concurrent submissions for the same
/// `(student_id, assignment_question_id)` must not race to a result where
/// the stored score is not the maximum ever submitted.
#[async_trait]
pub trait AnswerStore: Send + Sync {
    /// Fetch the stored record for one key, if any.
    async fn get(
        &self,
        student_id: &str,
        assignment_question_id: &str,
    ) -> Result<Option<AnswerRecord>, ScoringError>;

    /// Insert the candidate if no record exists, or replace the existing
    /// record if the candidate's score is strictly greater. Equal or lower
    /// scores leave the store unchanged and report `updated: false`.
    async fn upsert_if_better(
        &self,
        candidate: AnswerRecord,
    ) -> Result<UpsertOutcome, ScoringError>;

    /// Top scores for one question, descending by score, ties broken by
    /// submission order, at most `n` entries.
    async fn top_n(
        &self,
        assignment_question_id: &str,
        n: usize,
    ) -> Result<Vec<LeaderboardEntry>, ScoringError>;
}

// ---------------------------------------------------------------------------
// Assignment catalog
// ---------------------------------------------------------------------------

/// Read-only listing of authored assignments.
///
/// A missing assignment is an ordinary outcome (`Ok(None)`), not an error.
pub trait AssignmentCatalog: Send + Sync {
    /// All assignments known to the catalog.
    fn list_assignments(&self) -> Result<Vec<Assignment>, ScoringError>;

    /// Fetch one assignment by id.
    fn get_assignment(&self, assignment_id: &str) -> Result<Option<Assignment>, ScoringError>;
}
