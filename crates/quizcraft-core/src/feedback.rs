//! Answer improvement suggestions.
//!
//! After a submission is scored, the caller can ask a text model for a
//! grammar correction and a rephrasing of the student's answer. Both are
//! single-sentence suggestions; failures surface as `GenerationUnavailable`
//! and are left to the caller.

use crate::error::ScoringError;
use crate::traits::{GenerateRequest, TextGenerator};

const SUGGESTION_MAX_TOKENS: u32 = 400;

/// Ask the model to correct grammar errors in the student's answer.
pub async fn suggest_grammar_fix(
    generator: &dyn TextGenerator,
    model: &str,
    answer_text: &str,
) -> Result<String, ScoringError> {
    let prompt = format!(
        "{answer_text}\nReview the text above and correct any grammar errors. \
         Keep your response in 1 sentence."
    );
    run_suggestion(generator, model, prompt).await
}

/// Ask the model to rephrase the student's answer while keeping its meaning.
pub async fn suggest_rephrasing(
    generator: &dyn TextGenerator,
    model: &str,
    answer_text: &str,
) -> Result<String, ScoringError> {
    let prompt = format!(
        "{answer_text}\nImprove the text above in a way that maintains its \
         original meaning but uses different words and sentence structures. \
         Keep your response in 1 sentence."
    );
    run_suggestion(generator, model, prompt).await
}

async fn run_suggestion(
    generator: &dyn TextGenerator,
    model: &str,
    prompt: String,
) -> Result<String, ScoringError> {
    let request = GenerateRequest {
        model: model.to_string(),
        prompt,
        system_prompt: None,
        max_tokens: SUGGESTION_MAX_TOKENS,
        temperature: 0.0,
    };
    let response = generator.generate(&request).await?;
    Ok(response.content.trim().to_string())
}
