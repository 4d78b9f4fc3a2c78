//! Assignment authoring helpers.
//!
//! Prompt construction for question generation, parsing of the model's JSON
//! output, and the assignment id scheme.

use rand::Rng;

use crate::error::ScoringError;
use crate::model::AssignmentQuestion;

/// How many question/answer pairs the authoring prompt asks for.
pub const QUESTION_COUNT: usize = 5;

/// Offset subtracted from the epoch so assignment ids stay short.
/// Changing this breaks ordering against previously issued ids.
const ID_EPOCH_OFFSET_MS: i64 = 1_670_000_000_000;

/// Build the question-generation prompt for a piece of input text.
pub fn question_prompt(input_text: &str) -> String {
    format!(
        "{input_text}\n Using the above context, please generate five questions \
         and answers you could ask students about this information.\n\
         Format the output as a list of five JSON objects containing the keys: \
         Id, Question, and Answer"
    )
}

/// Build the illustration prompt for a piece of input text.
pub fn image_prompt(input_text: &str) -> String {
    format!("An image of {input_text}")
}

#[derive(serde::Deserialize)]
struct RawQuestion {
    #[serde(rename = "Id")]
    id: serde_json::Value,
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Answer")]
    answer: String,
}

/// Parse the model's question/answer output into `AssignmentQuestion`s.
///
/// Handles markdown ```json fences around the array and accepts numeric or
/// string ids. Anything else is `InvalidInput`.
pub fn parse_generated_questions(text: &str) -> Result<Vec<AssignmentQuestion>, ScoringError> {
    let stripped = strip_code_fences(text);

    let raw: Vec<RawQuestion> = serde_json::from_str(&stripped).map_err(|e| {
        ScoringError::InvalidInput(format!("model output is not a JSON question list: {e}"))
    })?;

    raw.into_iter()
        .map(|q| {
            let id = match q.id {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                other => {
                    return Err(ScoringError::InvalidInput(format!(
                        "question Id must be a string or number, got: {other}"
                    )))
                }
            };
            Ok(AssignmentQuestion {
                id,
                question: q.question,
                answer: q.answer,
            })
        })
        .collect()
}

/// Strip a surrounding markdown code fence, if present.
fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed.to_string();
    }

    let mut lines: Vec<&str> = trimmed.lines().collect();
    // Drop the opening fence line (``` or ```json).
    lines.remove(0);
    if lines.last().is_some_and(|l| l.trim() == "```") {
        lines.pop();
    }
    lines.join("\n")
}

/// Generate a new assignment id.
///
/// Milliseconds since a fixed 2022 offset, scaled by 1000 plus a random
/// 0..999 component. Monotonic enough for display ordering and collision
/// resistant enough for single-teacher authoring.
pub fn generate_assignment_id() -> String {
    let epoch_ms = chrono::Utc::now().timestamp_millis() - ID_EPOCH_OFFSET_MS;
    let rand_id: i64 = rand::thread_rng().gen_range(0..1000);
    (epoch_ms * 1000 + rand_id).to_string()
}
