//! Core data model, scoring, and submission pipeline for quizcraft.
//!
//! This crate defines the fundamental data model, trait seams, and the
//! embedding-based answer-scoring logic that the entire quizcraft system
//! builds on.

pub mod authoring;
pub mod catalog;
pub mod error;
pub mod feedback;
pub mod model;
pub mod pipeline;
pub mod similarity;
pub mod traits;
