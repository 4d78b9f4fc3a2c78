//! Answer record stores for quizcraft.
//!
//! Implements the `AnswerStore` trait from `quizcraft-core` twice: an
//! in-memory store and a JSON-file-backed store. Both guarantee that
//! `upsert_if_better` is a single atomic read-modify-write per key, so the
//! stored score is always the maximum ever submitted for that key even
//! under concurrent submissions.

mod file;
mod memory;
mod records;

pub use file::FileStore;
pub use memory::MemoryStore;
