//! In-memory answer store.

use std::sync::Mutex;

use async_trait::async_trait;

use quizcraft_core::error::ScoringError;
use quizcraft_core::model::{AnswerRecord, LeaderboardEntry};
use quizcraft_core::traits::{AnswerStore, UpsertOutcome};

use crate::records::RecordTable;

/// An in-memory `AnswerStore`. Suitable for tests and single-process use;
/// records do not survive the process.
#[derive(Default)]
pub struct MemoryStore {
    table: Mutex<RecordTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, RecordTable>, ScoringError> {
        self.table
            .lock()
            .map_err(|_| ScoringError::StorageUnavailable("store lock poisoned".into()))
    }
}

#[async_trait]
impl AnswerStore for MemoryStore {
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
        Ok(self.lock()?.upsert_if_better(candidate))
    }

    async fn top_n(
        &self,
        assignment_question_id: &str,
        n: usize,
    ) -> Result<Vec<LeaderboardEntry>, ScoringError> {
        Ok(self.lock()?.top_n(assignment_question_id, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(student: &str, key: &str, score: i32) -> AnswerRecord {
        AnswerRecord {
            student_id: student.into(),
            assignment_question_id: key.into(),
            answer_text: "an answer".into(),
            score,
        }
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("alice", "A1_Q1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_then_get() {
        let store = MemoryStore::new();
        let outcome = store
            .upsert_if_better(record("alice", "A1_Q1", 72))
            .await
            .unwrap();
        assert!(outcome.updated);

        let stored = store.get("alice", "A1_Q1").await.unwrap().unwrap();
        assert_eq!(stored.score, 72);
    }

    #[tokio::test]
    async fn concurrent_upserts_keep_the_maximum() {
        let store = Arc::new(MemoryStore::new());

        let mut handles = Vec::new();
        for score in 0..100 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .upsert_if_better(record("alice", "A1_Q1", score))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stored = store.get("alice", "A1_Q1").await.unwrap().unwrap();
        assert_eq!(stored.score, 99);
    }

    #[tokio::test]
    async fn leaderboard_scenario() {
        let store = MemoryStore::new();
        store
            .upsert_if_better(record("alice", "A1_Q1", 80))
            .await
            .unwrap();
        store
            .upsert_if_better(record("bob", "A1_Q1", 95))
            .await
            .unwrap();

        let top = store.top_n("A1_Q1", 5).await.unwrap();
        assert_eq!(
            top,
            vec![
                LeaderboardEntry {
                    student_id: "bob".into(),
                    score: 95
                },
                LeaderboardEntry {
                    student_id: "alice".into(),
                    score: 80
                },
            ]
        );
    }
}
