//! The submission scoring pipeline.
//!
//! Composes the embedder, similarity scorer, and answer store to process
//! one student submission end-to-end: embed both texts, score, conditionally
//! update the stored best, and fetch the leaderboard.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::error::ScoringError;
use crate::model::{question_key, AnswerRecord, ScoringResult};
use crate::similarity;
use crate::traits::{AnswerStore, TextEmbedder};

/// Configuration for the scoring pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of leaderboard entries returned with each result.
    pub leaderboard_size: usize,
    /// Bound on each external embedding call. Timeouts surface as
    /// `EmbeddingUnavailable`; `None` disables the bound.
    pub embed_timeout: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            leaderboard_size: 5,
            embed_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// One student submission.
///
/// Student identity is always explicit here; nothing in the pipeline assumes
/// a fixed user. The correct answer text comes from the catalog; validating
/// catalog membership is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct Submission {
    pub student_id: String,
    pub assignment_id: String,
    pub question_id: String,
    pub answer_text: String,
    pub correct_answer_text: String,
}

/// The scoring pipeline orchestrator.
pub struct ScoringPipeline {
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn AnswerStore>,
    config: PipelineConfig,
}

impl ScoringPipeline {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        store: Arc<dyn AnswerStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            config,
        }
    }

    /// Score one submission end-to-end.
    ///
    /// Empty answer text is accepted and scored like any text; rejecting
    /// blank answers, if desired, belongs to the caller. Collaborator errors
    /// propagate verbatim with no retries; an embedding failure leaves the
    /// store untouched.
    pub async fn submit(&self, submission: &Submission) -> Result<ScoringResult, ScoringError> {
        let submission_id = Uuid::new_v4();

        let (correct_vec, answer_vec) = tokio::try_join!(
            self.embed(&submission.correct_answer_text),
            self.embed(&submission.answer_text),
        )?;

        let score = similarity::score(&correct_vec, &answer_vec)?;

        let key = question_key(&submission.assignment_id, &submission.question_id);
        let candidate = AnswerRecord {
            student_id: submission.student_id.clone(),
            assignment_question_id: key.clone(),
            answer_text: submission.answer_text.clone(),
            score,
        };

        let outcome = self.store.upsert_if_better(candidate).await?;
        let leaderboard = self.store.top_n(&key, self.config.leaderboard_size).await?;

        tracing::info!(
            %submission_id,
            student = %submission.student_id,
            question = %key,
            score,
            updated = outcome.updated,
            "submission scored"
        );

        Ok(ScoringResult {
            submission_id,
            score,
            updated: outcome.updated,
            best: outcome.current,
            leaderboard,
        })
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ScoringError> {
        match self.config.embed_timeout {
            Some(bound) => tokio::time::timeout(bound, self.embedder.embed(text))
                .await
                .map_err(|_| {
                    ScoringError::EmbeddingUnavailable(format!(
                        "embedding call timed out after {}s",
                        bound.as_secs()
                    ))
                })?,
            None => self.embedder.embed(text).await,
        }
    }
}
