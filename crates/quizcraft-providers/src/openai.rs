//! OpenAI-compatible provider.
//!
//! Talks to the OpenAI REST API (or any compatible endpoint via a custom
//! base URL): `/v1/embeddings` for answer embeddings, `/v1/chat/completions`
//! for question generation and writing suggestions, and
//! `/v1/images/generations` for assignment cover images.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

use quizcraft_core::error::ScoringError;
use quizcraft_core::traits::{
    GenerateRequest, GenerateResponse, ImageGenerator, TextEmbedder, TextGenerator,
};

use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
const REQUEST_TIMEOUT_SECS: u64 = 120;

pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    org_id: Option<String>,
    embedding_model: String,
    image_model: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String, base_url: Option<String>, org_id: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            org_id,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            client,
        }
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));
        let mut builder = self.client.post(url).bearer_auth(&self.api_key);
        if let Some(org) = &self.org_id {
            builder = builder.header("OpenAI-Organization", org);
        }
        builder
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ProviderError> {
        tracing::debug!(path, "openai request");
        let response = self
            .request(path)
            .json(body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status.as_u16(), response).await);
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::NetworkError(format!("failed to parse response: {e}")))
    }
}

fn classify_transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(REQUEST_TIMEOUT_SECS)
    } else {
        ProviderError::NetworkError(e.to_string())
    }
}

async fn classify_status(status: u16, response: reqwest::Response) -> ProviderError {
    let retry_after_ms = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(|secs| secs * 1000)
        .unwrap_or(1000);
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    match status {
        429 => ProviderError::RateLimited { retry_after_ms },
        401 => ProviderError::AuthenticationFailed(message),
        404 => ProviderError::ModelNotFound(message),
        _ => ProviderError::ApiError { status, message },
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    model: String,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    b64_json: String,
}

#[async_trait]
impl TextEmbedder for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ScoringError> {
        let body = EmbeddingsRequest {
            model: &self.embedding_model,
            input: text,
        };
        let response: EmbeddingsResponse = self
            .post("/v1/embeddings", &body)
            .await
            .map_err(ProviderError::into_embedding_error)?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                ScoringError::EmbeddingUnavailable("response contained no embedding".into())
            })
    }
}

#[async_trait]
impl TextGenerator for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ScoringError> {
        let mut messages = Vec::new();
        if let Some(system) = &request.system_prompt {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });

        let body = ChatRequest {
            model: &request.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let start = Instant::now();
        let response: ChatResponse = self
            .post("/v1/chat/completions", &body)
            .await
            .map_err(ProviderError::into_generation_error)?;
        let latency_ms = start.elapsed().as_millis() as u64;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                ScoringError::GenerationUnavailable("response contained no choices".into())
            })?;

        Ok(GenerateResponse {
            content,
            model: response.model,
            latency_ms,
        })
    }
}

#[async_trait]
impl ImageGenerator for OpenAiProvider {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, ScoringError> {
        let body = ImageRequest {
            model: &self.image_model,
            prompt,
            n: 1,
            size: "1024x1024",
            response_format: "b64_json",
        };
        let response: ImageResponse = self
            .post("/v1/images/generations", &body)
            .await
            .map_err(ProviderError::into_generation_error)?;

        let encoded = response.data.into_iter().next().ok_or_else(|| {
            ScoringError::GenerationUnavailable("response contained no image".into())
        })?;

        base64::engine::general_purpose::STANDARD
            .decode(encoded.b64_json)
            .map_err(|e| {
                ScoringError::GenerationUnavailable(format!("image payload is not base64: {e}"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenAiProvider {
        OpenAiProvider::new("test-key".to_string(), Some(server.uri()), None)
    }

    #[tokio::test]
    async fn embed_returns_the_vector() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "text-embedding-3-small",
                "input": "photosynthesis"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"embedding": [0.1, 0.2, 0.3]}],
                "model": "text-embedding-3-small"
            })))
            .mount(&server)
            .await;

        let vector = provider(&server).embed("photosynthesis").await.unwrap();
        assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn embed_auth_failure_is_embedding_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided"}
            })))
            .mount(&server)
            .await;

        let err = provider(&server).embed("anything").await.unwrap_err();
        assert!(matches!(err, ScoringError::EmbeddingUnavailable(_)));
        assert!(err.to_string().contains("authentication failed"));
    }

    #[tokio::test]
    async fn embed_empty_data_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [], "model": "text-embedding-3-small"})),
            )
            .mount(&server)
            .await;

        let err = provider(&server).embed("anything").await.unwrap_err();
        assert!(err.to_string().contains("no embedding"));
    }

    #[tokio::test]
    async fn generate_uses_chat_completions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({"model": "gpt-4.1-mini"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "[]"}}],
                "model": "gpt-4.1-mini"
            })))
            .mount(&server)
            .await;

        let request = GenerateRequest {
            model: "gpt-4.1-mini".to_string(),
            prompt: "generate questions".to_string(),
            system_prompt: None,
            max_tokens: 1024,
            temperature: 0.0,
        };
        let response = provider(&server).generate(&request).await.unwrap();
        assert_eq!(response.content, "[]");
        assert_eq!(response.model, "gpt-4.1-mini");
    }

    #[tokio::test]
    async fn generate_rate_limit_is_generation_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "2")
                    .set_body_json(json!({"error": {"message": "slow down"}})),
            )
            .mount(&server)
            .await;

        let request = GenerateRequest {
            model: "gpt-4.1-mini".to_string(),
            prompt: "anything".to_string(),
            system_prompt: None,
            max_tokens: 16,
            temperature: 0.0,
        };
        let err = provider(&server).generate(&request).await.unwrap_err();
        assert!(matches!(err, ScoringError::GenerationUnavailable(_)));
        assert!(err.to_string().contains("2000ms"));
    }

    #[tokio::test]
    async fn generate_image_decodes_base64() {
        let server = MockServer::start().await;
        let payload = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3, 4]);
        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(body_partial_json(json!({"response_format": "b64_json"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": [{"b64_json": payload}]})),
            )
            .mount(&server)
            .await;

        let bytes = provider(&server)
            .generate_image("An image of a bee")
            .await
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3, 4]);
    }
}
