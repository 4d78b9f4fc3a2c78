//! Core data model types for quizcraft.
//!
//! These are the fundamental types the entire quizcraft system uses to
//! represent assignments, questions, answer records, and scoring results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single question with its reference answer.
///
/// Immutable once authored; belongs to an [`Assignment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentQuestion {
    /// Identifier unique within the assignment (e.g. "1").
    pub id: String,
    /// The question text shown to the student.
    pub question: String,
    /// The reference answer submissions are scored against.
    pub answer: String,
}

/// A quiz assignment: source prompt, optional illustration, and questions.
///
/// Created once by the authoring flow and read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique assignment identifier.
    pub assignment_id: String,
    /// The input text the questions were generated from.
    pub prompt: String,
    /// Reference to a generated illustration, if one exists.
    #[serde(default)]
    pub image_ref: Option<String>,
    /// Identity of the authoring teacher.
    #[serde(default)]
    pub teacher_id: Option<String>,
    /// When the assignment was authored.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// The questions, in authored order.
    #[serde(default)]
    pub questions: Vec<AssignmentQuestion>,
}

impl Assignment {
    /// Look up a question by its id.
    pub fn question(&self, question_id: &str) -> Option<&AssignmentQuestion> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

/// Build the persisted composite key identifying a question across
/// assignments.
///
/// The `assignment_id + "_" + question_id` format is a stored convention;
/// existing answer records depend on it.
pub fn question_key(assignment_id: &str, question_id: &str) -> String {
    format!("{assignment_id}_{question_id}")
}

/// A student's best answer for one question.
///
/// Uniquely identified by `(student_id, assignment_question_id)`. The score
/// is the maximum ever submitted by that student for that question; records
/// are replaced only by a strictly better submission and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// The submitting student.
    pub student_id: String,
    /// Composite key, see [`question_key`].
    pub assignment_question_id: String,
    /// The answer text that achieved `score`.
    pub answer_text: String,
    /// Similarity score. Usually in [0, 100] but not clamped; atypical
    /// embedding pairs can produce negative values.
    pub score: i32,
}

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub student_id: String,
    pub score: i32,
}

/// Outcome of scoring one submission end-to-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringResult {
    /// Identifier for this submission, for log correlation.
    pub submission_id: Uuid,
    /// The score of *this* submission (not necessarily the stored best).
    pub score: i32,
    /// Whether the stored best record changed.
    pub updated: bool,
    /// The stored best record after this submission.
    pub best: AnswerRecord,
    /// Top scores for the question, descending.
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_key_format() {
        assert_eq!(question_key("1714003456789123", "1"), "1714003456789123_1");
        assert_eq!(question_key("a1", "q2"), "a1_q2");
    }

    #[test]
    fn question_lookup() {
        let assignment = Assignment {
            assignment_id: "a1".into(),
            prompt: "The water cycle".into(),
            image_ref: None,
            teacher_id: None,
            created_at: None,
            questions: vec![
                AssignmentQuestion {
                    id: "1".into(),
                    question: "What drives evaporation?".into(),
                    answer: "The sun".into(),
                },
                AssignmentQuestion {
                    id: "2".into(),
                    question: "What forms clouds?".into(),
                    answer: "Condensation".into(),
                },
            ],
        };
        assert_eq!(assignment.question("2").unwrap().answer, "Condensation");
        assert!(assignment.question("3").is_none());
    }

    #[test]
    fn answer_record_serde_roundtrip() {
        let record = AnswerRecord {
            student_id: "alice".into(),
            assignment_question_id: "a1_1".into(),
            answer_text: "the sun heats the oceans".into(),
            score: 87,
        };
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: AnswerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, record);
    }

    #[test]
    fn assignment_optional_fields_default() {
        let toml_str = r#"
assignment_id = "a1"
prompt = "text"
"#;
        let assignment: Assignment = toml::from_str(toml_str).unwrap();
        assert!(assignment.image_ref.is_none());
        assert!(assignment.questions.is_empty());
    }
}
