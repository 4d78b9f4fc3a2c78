//! Ollama provider for local models.
//!
//! Uses the Ollama REST API: `/api/embeddings` for answer embeddings and
//! `/api/generate` (non-streaming) for question generation and writing
//! suggestions. Ollama has no image endpoint, so this provider does not
//! implement `ImageGenerator`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use quizcraft_core::error::ScoringError;
use quizcraft_core::traits::{GenerateRequest, GenerateResponse, TextEmbedder, TextGenerator};

use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";
const REQUEST_TIMEOUT_SECS: u64 = 300;

pub struct OllamaProvider {
    base_url: String,
    embedding_model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(base_url: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            client,
        }
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
        model: &str,
    ) -> Result<R, ProviderError> {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));
        tracing::debug!(path, model, "ollama request");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, &self.base_url))?;

        let status = response.status().as_u16();
        if status == 404 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ModelNotFound(format!(
                "{model} ({body}). Pull it with: ollama pull {model}"
            )));
        }
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError { status, message });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::NetworkError(format!("failed to parse response: {e}")))
    }
}

fn classify_transport_error(e: reqwest::Error, base_url: &str) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(REQUEST_TIMEOUT_SECS)
    } else if e.is_connect() {
        ProviderError::NetworkError(format!(
            "cannot reach Ollama at {base_url}. Is it running? Start with: ollama serve"
        ))
    } else {
        ProviderError::NetworkError(e.to_string())
    }
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f64,
    num_predict: u32,
}

#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    model: String,
}

#[async_trait]
impl TextEmbedder for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ScoringError> {
        let body = EmbeddingsRequest {
            model: &self.embedding_model,
            prompt: text,
        };
        let response: EmbeddingsResponse = self
            .post("/api/embeddings", &body, &self.embedding_model)
            .await
            .map_err(ProviderError::into_embedding_error)?;

        if response.embedding.is_empty() {
            return Err(ScoringError::EmbeddingUnavailable(
                "response contained an empty embedding".into(),
            ));
        }
        Ok(response.embedding)
    }
}

#[async_trait]
impl TextGenerator for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ScoringError> {
        let body = OllamaGenerateRequest {
            model: &request.model,
            prompt: &request.prompt,
            system: request.system_prompt.as_deref(),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let start = Instant::now();
        let response: OllamaGenerateResponse = self
            .post("/api/generate", &body, &request.model)
            .await
            .map_err(ProviderError::into_generation_error)?;
        let latency_ms = start.elapsed().as_millis() as u64;

        Ok(GenerateResponse {
            content: response.response,
            model: response.model,
            latency_ms,
        })
    }
}
