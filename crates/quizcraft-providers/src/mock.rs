//! Deterministic mock provider for tests and offline use.
//!
//! Embeddings are derived from a stable hash of the input text, so equal
//! texts always embed to the same vector (and score 100 against each
//! other) while different texts land somewhere below. Generation responses
//! are matched by prompt substring, falling back to a canned five-question
//! list so assignment creation works without a real model.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizcraft_core::error::ScoringError;
use quizcraft_core::traits::{
    GenerateRequest, GenerateResponse, ImageGenerator, TextEmbedder, TextGenerator,
};

const MOCK_DIMENSION: usize = 64;

const DEFAULT_QUESTIONS: &str = r#"[
  {"Id": 1, "Question": "What is the main topic of the text?", "Answer": "The main topic of the provided text"},
  {"Id": 2, "Question": "Who is involved?", "Answer": "The people mentioned in the text"},
  {"Id": 3, "Question": "Where does it take place?", "Answer": "The place described in the text"},
  {"Id": 4, "Question": "When does it happen?", "Answer": "The time described in the text"},
  {"Id": 5, "Question": "Why is it important?", "Answer": "The significance described in the text"}
]"#;

// 1x1 transparent PNG.
const MOCK_IMAGE: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x62, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

pub struct MockProvider {
    embeddings: HashMap<String, Vec<f32>>,
    responses: Vec<(String, String)>,
    default_response: String,
    embed_calls: AtomicU32,
    generate_calls: AtomicU32,
    last_prompt: Mutex<Option<String>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            embeddings: HashMap::new(),
            responses: Vec::new(),
            default_response: DEFAULT_QUESTIONS.to_string(),
            embed_calls: AtomicU32::new(0),
            generate_calls: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Pin an exact vector for a given input text.
    pub fn with_embedding(mut self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.embeddings.insert(text.into(), vector);
        self
    }

    /// Respond with `response` when the prompt contains `pattern`.
    /// Patterns are tried in insertion order.
    pub fn with_response(mut self, pattern: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses.push((pattern.into(), response.into()));
        self
    }

    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    pub fn embed_call_count(&self) -> u32 {
        self.embed_calls.load(Ordering::SeqCst)
    }

    pub fn generate_call_count(&self) -> u32 {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|g| g.clone())
    }
}

fn hashed_vector(text: &str, dimension: usize) -> Vec<f32> {
    let mut vector = Vec::with_capacity(dimension);
    for i in 0..dimension {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        i.hash(&mut hasher);
        // Components stay strictly positive so no hashed vector has zero
        // norm and no pair is exactly opposite.
        vector.push((hasher.finish() % 1000) as f32 / 1000.0 + 0.001);
    }
    vector
}

#[async_trait]
impl TextEmbedder for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ScoringError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        match self.embeddings.get(text) {
            Some(vector) => Ok(vector.clone()),
            None => Ok(hashed_vector(text, MOCK_DIMENSION)),
        }
    }
}

#[async_trait]
impl TextGenerator for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ScoringError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_prompt.lock() {
            *guard = Some(request.prompt.clone());
        }

        let content = self
            .responses
            .iter()
            .find(|(pattern, _)| request.prompt.contains(pattern))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.default_response.clone());

        Ok(GenerateResponse {
            content,
            model: "mock".to_string(),
            latency_ms: 0,
        })
    }
}

#[async_trait]
impl ImageGenerator for MockProvider {
    async fn generate_image(&self, _prompt: &str) -> Result<Vec<u8>, ScoringError> {
        Ok(MOCK_IMAGE.to_vec())
    }
}
