//! Hosted-model integrations for quizcraft.
//!
//! Implements the `TextEmbedder`, `TextGenerator`, and `ImageGenerator`
//! traits for OpenAI-compatible APIs and Ollama, plus a deterministic mock
//! provider for tests and offline use.

pub mod config;
pub mod error;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{
    create_embedder, create_generator, create_image_generator, load_config, ProviderConfig,
    QuizcraftConfig,
};
pub use error::ProviderError;
