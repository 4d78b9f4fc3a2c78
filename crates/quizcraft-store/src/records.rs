//! Shared record table used by both store implementations.

use serde::{Deserialize, Serialize};

use quizcraft_core::model::{AnswerRecord, LeaderboardEntry};
use quizcraft_core::traits::UpsertOutcome;

/// A stored record plus the write sequence used for leaderboard tie-breaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredRecord {
    pub record: AnswerRecord,
    /// Assigned on each winning write. On equal scores, the submission that
    /// reached the score first keeps the lower sequence and ranks first.
    pub seq: u64,
}

/// The record table. Callers must hold it behind a single lock so that
/// `upsert_if_better` is one atomic read-modify-write per key.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct RecordTable {
    pub next_seq: u64,
    pub records: Vec<StoredRecord>,
}

impl RecordTable {
    pub fn get(&self, student_id: &str, assignment_question_id: &str) -> Option<&AnswerRecord> {
        self.records
            .iter()
            .find(|s| {
                s.record.student_id == student_id
                    && s.record.assignment_question_id == assignment_question_id
            })
            .map(|s| &s.record)
    }

    /// Insert when absent; replace only on a strictly greater score.
    pub fn upsert_if_better(&mut self, candidate: AnswerRecord) -> UpsertOutcome {
        let existing = self.records.iter_mut().find(|s| {
            s.record.student_id == candidate.student_id
                && s.record.assignment_question_id == candidate.assignment_question_id
        });

        match existing {
            Some(slot) if candidate.score > slot.record.score => {
                slot.record = candidate.clone();
                slot.seq = self.next_seq;
                self.next_seq += 1;
                UpsertOutcome {
                    updated: true,
                    current: candidate,
                }
            }
            Some(slot) => UpsertOutcome {
                updated: false,
                current: slot.record.clone(),
            },
            None => {
                let seq = self.next_seq;
                self.next_seq += 1;
                self.records.push(StoredRecord {
                    record: candidate.clone(),
                    seq,
                });
                UpsertOutcome {
                    updated: true,
                    current: candidate,
                }
            }
        }
    }

    /// Top scores for one question: descending by score, ties broken by
    /// ascending sequence, at most `n` entries.
    pub fn top_n(&self, assignment_question_id: &str, n: usize) -> Vec<LeaderboardEntry> {
        let mut matching: Vec<&StoredRecord> = self
            .records
            .iter()
            .filter(|s| s.record.assignment_question_id == assignment_question_id)
            .collect();
        matching.sort_by(|a, b| b.record.score.cmp(&a.record.score).then(a.seq.cmp(&b.seq)));
        matching
            .into_iter()
            .take(n)
            .map(|s| LeaderboardEntry {
                student_id: s.record.student_id.clone(),
                score: s.record.score,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(student: &str, key: &str, score: i32) -> AnswerRecord {
        AnswerRecord {
            student_id: student.into(),
            assignment_question_id: key.into(),
            answer_text: format!("answer scoring {score}"),
            score,
        }
    }

    #[test]
    fn best_score_scenario() {
        let mut table = RecordTable::default();

        let first = table.upsert_if_better(record("alice", "A1_Q1", 72));
        assert!(first.updated);
        assert_eq!(first.current.score, 72);

        let worse = table.upsert_if_better(record("alice", "A1_Q1", 65));
        assert!(!worse.updated);
        assert_eq!(worse.current.score, 72);

        let better = table.upsert_if_better(record("alice", "A1_Q1", 90));
        assert!(better.updated);
        assert_eq!(table.get("alice", "A1_Q1").unwrap().score, 90);
    }

    #[test]
    fn equal_score_is_not_an_update() {
        let mut table = RecordTable::default();
        table.upsert_if_better(record("alice", "A1_Q1", 72));

        let repeat = table.upsert_if_better(record("alice", "A1_Q1", 72));
        assert!(!repeat.updated);
        // The original answer text is kept, not the repeat's.
        assert_eq!(repeat.current.answer_text, "answer scoring 72");
    }

    #[test]
    fn stored_score_is_maximum_of_all_submissions() {
        let mut table = RecordTable::default();
        for score in [40, 85, 12, 85, 60, -5] {
            table.upsert_if_better(record("alice", "A1_Q1", score));
        }
        assert_eq!(table.get("alice", "A1_Q1").unwrap().score, 85);
    }

    #[test]
    fn top_n_orders_descending() {
        let mut table = RecordTable::default();
        table.upsert_if_better(record("alice", "A1_Q1", 80));
        table.upsert_if_better(record("bob", "A1_Q1", 95));
        table.upsert_if_better(record("carol", "A1_Q2", 99));

        let top = table.top_n("A1_Q1", 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].student_id, "bob");
        assert_eq!(top[0].score, 95);
        assert_eq!(top[1].student_id, "alice");
        assert_eq!(top[1].score, 80);
    }

    #[test]
    fn top_n_limits_length() {
        let mut table = RecordTable::default();
        for i in 0..10 {
            table.upsert_if_better(record(&format!("student{i}"), "A1_Q1", i));
        }
        assert_eq!(table.top_n("A1_Q1", 3).len(), 3);
        assert_eq!(table.top_n("A1_Q1", 0).len(), 0);
    }

    #[test]
    fn ties_preserve_submission_order() {
        let mut table = RecordTable::default();
        table.upsert_if_better(record("alice", "A1_Q1", 80));
        table.upsert_if_better(record("bob", "A1_Q1", 80));
        table.upsert_if_better(record("carol", "A1_Q1", 80));

        let top = table.top_n("A1_Q1", 5);
        let names: Vec<&str> = top.iter().map(|e| e.student_id.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn improving_into_a_tie_ranks_after_the_earlier_holder() {
        let mut table = RecordTable::default();
        table.upsert_if_better(record("alice", "A1_Q1", 70));
        table.upsert_if_better(record("bob", "A1_Q1", 80));
        // Alice later reaches 80 as well; bob got there first.
        table.upsert_if_better(record("alice", "A1_Q1", 80));

        let top = table.top_n("A1_Q1", 5);
        assert_eq!(top[0].student_id, "bob");
        assert_eq!(top[1].student_id, "alice");
    }

    #[test]
    fn keys_are_disjoint_per_student_and_question() {
        let mut table = RecordTable::default();
        table.upsert_if_better(record("alice", "A1_Q1", 50));
        table.upsert_if_better(record("alice", "A1_Q2", 60));
        table.upsert_if_better(record("bob", "A1_Q1", 70));

        assert_eq!(table.get("alice", "A1_Q1").unwrap().score, 50);
        assert_eq!(table.get("alice", "A1_Q2").unwrap().score, 60);
        assert_eq!(table.get("bob", "A1_Q1").unwrap().score, 70);
        assert!(table.get("bob", "A1_Q2").is_none());
    }
}
