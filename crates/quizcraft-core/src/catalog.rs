//! TOML assignment catalog.
//!
//! Loads assignments from TOML files and directories, validates them, and
//! exposes them through the read-only [`AssignmentCatalog`] trait.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScoringError;
use crate::model::{Assignment, AssignmentQuestion};
use crate::traits::AssignmentCatalog;

/// Intermediate TOML structure for assignment files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlAssignmentFile {
    assignment: TomlAssignmentHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlAssignmentHeader {
    id: String,
    prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    teacher_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuestion {
    id: String,
    question: String,
    answer: String,
}

/// Parse a single TOML file into an `Assignment`.
pub fn parse_assignment(path: &Path) -> Result<Assignment> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read assignment file: {}", path.display()))?;

    parse_assignment_str(&content, path)
}

/// Parse a TOML string into an `Assignment` (useful for testing).
pub fn parse_assignment_str(content: &str, source_path: &Path) -> Result<Assignment> {
    let parsed: TomlAssignmentFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| AssignmentQuestion {
            id: q.id,
            question: q.question,
            answer: q.answer,
        })
        .collect();

    Ok(Assignment {
        assignment_id: parsed.assignment.id,
        prompt: parsed.assignment.prompt,
        image_ref: parsed.assignment.image_ref,
        teacher_id: parsed.assignment.teacher_id,
        created_at: parsed.assignment.created_at,
        questions,
    })
}

/// Render an `Assignment` as assignment-file TOML, the inverse of
/// [`parse_assignment_str`].
pub fn assignment_to_toml(assignment: &Assignment) -> Result<String> {
    let file = TomlAssignmentFile {
        assignment: TomlAssignmentHeader {
            id: assignment.assignment_id.clone(),
            prompt: assignment.prompt.clone(),
            image_ref: assignment.image_ref.clone(),
            teacher_id: assignment.teacher_id.clone(),
            created_at: assignment.created_at,
        },
        questions: assignment
            .questions
            .iter()
            .map(|q| TomlQuestion {
                id: q.id.clone(),
                question: q.question.clone(),
                answer: q.answer.clone(),
            })
            .collect(),
    };
    toml::to_string_pretty(&file).context("failed to serialize assignment")
}

/// Recursively load all `.toml` assignment files from a directory.
///
/// Unparseable files are skipped with a warning rather than failing the
/// whole catalog.
pub fn load_catalog_directory(dir: &Path) -> Result<Vec<Assignment>> {
    let mut assignments = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            assignments.extend(load_catalog_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_assignment(&path) {
                Ok(assignment) => assignments.push(assignment),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(assignments)
}

/// A warning from assignment validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate an assignment for common authoring issues.
pub fn validate_assignment(assignment: &Assignment) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if assignment.prompt.trim().is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "assignment prompt is empty".into(),
        });
    }

    if assignment.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "assignment has no questions".into(),
        });
    }

    // Duplicate question ids break the composite answer-record key.
    let mut seen_ids = std::collections::HashSet::new();
    for question in &assignment.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    for question in &assignment.questions {
        if question.question.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "question text is empty".into(),
            });
        }
        if question.answer.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: "reference answer is empty".into(),
            });
        }
    }

    if let Some(image_ref) = &assignment.image_ref {
        if image_ref.trim().is_empty() {
            warnings.push(ValidationWarning {
                question_id: None,
                message: "image_ref is present but empty".into(),
            });
        }
    }

    warnings
}

/// Catalog backed by a directory of TOML files, loaded once on open.
pub struct FileCatalog {
    assignments: Vec<Assignment>,
}

impl FileCatalog {
    /// Load every assignment under `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        Ok(Self {
            assignments: load_catalog_directory(dir)?,
        })
    }
}

impl AssignmentCatalog for FileCatalog {
    fn list_assignments(&self) -> Result<Vec<Assignment>, ScoringError> {
        Ok(self.assignments.clone())
    }

    fn get_assignment(&self, assignment_id: &str) -> Result<Option<Assignment>, ScoringError> {
        Ok(self
            .assignments
            .iter()
            .find(|a| a.assignment_id == assignment_id)
            .cloned())
    }
}

/// Catalog over an in-memory list of assignments, mainly for tests.
#[derive(Default)]
pub struct MemoryCatalog {
    assignments: Vec<Assignment>,
}

impl MemoryCatalog {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }
}

impl AssignmentCatalog for MemoryCatalog {
    fn list_assignments(&self) -> Result<Vec<Assignment>, ScoringError> {
        Ok(self.assignments.clone())
    }

    fn get_assignment(&self, assignment_id: &str) -> Result<Option<Assignment>, ScoringError> {
        Ok(self
            .assignments
            .iter()
            .find(|a| a.assignment_id == assignment_id)
            .cloned())
    }
}
