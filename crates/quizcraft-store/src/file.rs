//! JSON-file-backed answer store.
//!
//! The whole table lives in memory behind one lock and is written through
//! to disk on every winning upsert. Writes go to a temp file in the same
//! directory followed by a rename, so a failed write never corrupts the
//! store file.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use quizcraft_core::error::ScoringError;
use quizcraft_core::model::{AnswerRecord, LeaderboardEntry};
use quizcraft_core::traits::{AnswerStore, UpsertOutcome};

use crate::records::RecordTable;

/// A persistent `AnswerStore` backed by a single JSON file.
pub struct FileStore {
    path: PathBuf,
    table: Mutex<RecordTable>,
}

impl FileStore {
    /// Open a store at `path`, loading existing records if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ScoringError> {
        let path = path.into();
        let table = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                ScoringError::StorageUnavailable(format!(
                    "failed to read store file {}: {e}",
                    path.display()
                ))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                ScoringError::StorageUnavailable(format!(
                    "store file {} is corrupt: {e}",
                    path.display()
                ))
            })?
        } else {
            RecordTable::default()
        };

        Ok(Self {
            path,
            table: Mutex::new(table),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, RecordTable>, ScoringError> {
        self.table
            .lock()
            .map_err(|_| ScoringError::StorageUnavailable("store lock poisoned".into()))
    }

    fn persist(&self, table: &RecordTable) -> Result<(), ScoringError> {
        let json = serde_json::to_string_pretty(table).map_err(|e| {
            ScoringError::StorageUnavailable(format!("failed to serialize store: {e}"))
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| {
            ScoringError::StorageUnavailable(format!(
                "failed to create store directory {}: {e}",
                dir.display()
            ))
        })?;

        // The temp file must live in the same directory as the store file
        // for the rename to stay atomic.
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            ScoringError::StorageUnavailable(format!("failed to create temp store file: {e}"))
        })?;
        tmp.write_all(json.as_bytes()).map_err(|e| {
            ScoringError::StorageUnavailable(format!("failed to write store file: {e}"))
        })?;
        tmp.persist(&self.path).map_err(|e| {
            ScoringError::StorageUnavailable(format!(
                "failed to replace store file {}: {e}",
                self.path.display()
            ))
        })?;
        tracing::debug!(path = %self.path.display(), "store file written");
        Ok(())
    }
}

#[async_trait]
impl AnswerStore for FileStore {
    async fn get(
        &self,
        student_id: &str,
        assignment_question_id: &str,
    ) -> Result<Option<AnswerRecord>, ScoringError> {
        Ok(self.lock()?.get(student_id, assignment_question_id).cloned())
    }

    async fn upsert_if_better(
        &self,
        candidate: AnswerRecord,
    ) -> Result<UpsertOutcome, ScoringError> {
        let mut table = self.lock()?;
        let outcome = table.upsert_if_better(candidate);
        if outcome.updated {
            self.persist(&table)?;
        }
        Ok(outcome)
    }

    async fn top_n(
        &self,
        assignment_question_id: &str,
        n: usize,
    ) -> Result<Vec<LeaderboardEntry>, ScoringError> {
        Ok(self.lock()?.top_n(assignment_question_id, n))
    }
}
