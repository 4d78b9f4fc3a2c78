//! Configuration loading for quizcraft.
//!
//! Configuration is TOML, searched as `quizcraft.toml` in the working
//! directory and then `~/.config/quizcraft/config.toml`. API keys may be
//! written as `${VAR}` references resolved from the environment at load
//! time, and `QUIZCRAFT_OPENAI_KEY` overrides the OpenAI key outright.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use quizcraft_core::traits::{ImageGenerator, TextEmbedder, TextGenerator};

use crate::mock::MockProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

/// Top-level quizcraft configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizcraftConfig {
    /// Named provider definitions.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,

    /// Which provider to use when none is named on the command line.
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Embedding model identifier passed to the provider.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Text model used for question generation and suggestions.
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Image model for assignment illustrations. `None` disables images.
    #[serde(default)]
    pub image_model: Option<String>,

    /// Student identity used when `--student` is not given.
    #[serde(default = "default_student_id")]
    pub student_id: String,

    /// Directory of assignment TOML files.
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: PathBuf,

    /// Path of the JSON answer store.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,

    /// Per-embedding-call timeout in seconds.
    #[serde(default = "default_embed_timeout_secs")]
    pub embed_timeout_secs: u64,

    /// Number of leaderboard entries to show.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_text_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_student_id() -> String {
    "student".to_string()
}

fn default_catalog_dir() -> PathBuf {
    PathBuf::from("assignments")
}

fn default_store_path() -> PathBuf {
    PathBuf::from("answers.json")
}

fn default_embed_timeout_secs() -> u64 {
    30
}

fn default_leaderboard_size() -> usize {
    5
}

impl Default for QuizcraftConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            embedding_model: default_embedding_model(),
            text_model: default_text_model(),
            image_model: None,
            student_id: default_student_id(),
            catalog_dir: default_catalog_dir(),
            store_path: default_store_path(),
            embed_timeout_secs: default_embed_timeout_secs(),
            leaderboard_size: default_leaderboard_size(),
        }
    }
}

/// One provider definition.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Ollama {
        #[serde(default)]
        base_url: Option<String>,
    },
    Mock,
}

// Keys must never land in logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAI {
                base_url, org_id, ..
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            Self::Ollama { base_url } => {
                f.debug_struct("Ollama").field("base_url", base_url).finish()
            }
            Self::Mock => write!(f, "Mock"),
        }
    }
}

impl QuizcraftConfig {
    /// Parse a config from TOML text, resolving `${VAR}` references and the
    /// `QUIZCRAFT_OPENAI_KEY` override.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).context("failed to parse config")?;
        config.resolve_env();
        Ok(config)
    }

    /// Load a config file from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    /// The named provider, or the configured default when `name` is `None`.
    pub fn provider<'a>(
        &'a self,
        name: Option<&'a str>,
    ) -> Result<(&'a str, &'a ProviderConfig)> {
        let name = name.unwrap_or(&self.default_provider);
        match self.providers.get(name) {
            Some(config) => Ok((name, config)),
            None => {
                let mut known: Vec<&str> = self.providers.keys().map(String::as_str).collect();
                known.sort_unstable();
                bail!(
                    "provider '{name}' is not configured (known providers: {})",
                    known.join(", ")
                )
            }
        }
    }

    fn resolve_env(&mut self) {
        for provider in self.providers.values_mut() {
            if let ProviderConfig::OpenAI { api_key, .. } = provider {
                if let Ok(key) = std::env::var("QUIZCRAFT_OPENAI_KEY") {
                    *api_key = key;
                } else {
                    *api_key = resolve_env_refs(api_key);
                }
            }
        }
    }
}

/// Replace `${VAR}` with the value of the environment variable `VAR`.
/// Unset variables resolve to the empty string.
fn resolve_env_refs(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        match rest[start..].find('}') {
            Some(end) => {
                let var = &rest[start + 2..start + end];
                result.push_str(&std::env::var(var).unwrap_or_default());
                rest = &rest[start + end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

/// Load configuration from the standard search path: `quizcraft.toml` in the
/// working directory, then `~/.config/quizcraft/config.toml`. Falls back to
/// defaults when neither exists.
pub fn load_config() -> Result<QuizcraftConfig> {
    let cwd_config = Path::new("quizcraft.toml");
    if cwd_config.exists() {
        return QuizcraftConfig::load_from(cwd_config);
    }

    if let Some(home) = std::env::var_os("HOME") {
        let home_config = PathBuf::from(home).join(".config/quizcraft/config.toml");
        if home_config.exists() {
            return QuizcraftConfig::load_from(&home_config);
        }
    }

    Ok(QuizcraftConfig::default())
}

/// Build a `TextEmbedder` from one provider definition.
pub fn create_embedder(
    config: &ProviderConfig,
    embedding_model: &str,
) -> Result<Arc<dyn TextEmbedder>> {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => {
            if api_key.is_empty() {
                bail!("OpenAI API key is empty (set it in the config or QUIZCRAFT_OPENAI_KEY)");
            }
            Ok(Arc::new(
                OpenAiProvider::new(api_key.clone(), base_url.clone(), org_id.clone())
                    .with_embedding_model(embedding_model),
            ))
        }
        ProviderConfig::Ollama { base_url } => Ok(Arc::new(
            OllamaProvider::new(base_url.clone()).with_embedding_model(embedding_model),
        )),
        ProviderConfig::Mock => Ok(Arc::new(MockProvider::new())),
    }
}

/// Build a `TextGenerator` from one provider definition.
pub fn create_generator(config: &ProviderConfig) -> Result<Arc<dyn TextGenerator>> {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => {
            if api_key.is_empty() {
                bail!("OpenAI API key is empty (set it in the config or QUIZCRAFT_OPENAI_KEY)");
            }
            Ok(Arc::new(OpenAiProvider::new(
                api_key.clone(),
                base_url.clone(),
                org_id.clone(),
            )))
        }
        ProviderConfig::Ollama { base_url } => Ok(Arc::new(OllamaProvider::new(base_url.clone()))),
        ProviderConfig::Mock => Ok(Arc::new(MockProvider::new())),
    }
}

/// Build an `ImageGenerator` when the provider and config support one.
/// Ollama has no image endpoint; `image_model: None` disables images.
pub fn create_image_generator(
    config: &ProviderConfig,
    image_model: Option<&str>,
) -> Result<Option<Arc<dyn ImageGenerator>>> {
    let Some(model) = image_model else {
        return Ok(None);
    };
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Ok(Some(Arc::new(
            OpenAiProvider::new(api_key.clone(), base_url.clone(), org_id.clone())
                .with_image_model(model),
        ))),
        ProviderConfig::Ollama { .. } => Ok(None),
        ProviderConfig::Mock => Ok(Some(Arc::new(MockProvider::new()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_config() {
        let config = QuizcraftConfig::from_toml(
            r#"
            default_provider = "local"
            embedding_model = "nomic-embed-text"
            text_model = "mistral"
            student_id = "alice"
            catalog_dir = "my-assignments"
            store_path = "scores/answers.json"
            leaderboard_size = 10

            [providers.local]
            type = "ollama"
            base_url = "http://localhost:11434"

            [providers.mock]
            type = "mock"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_provider, "local");
        assert_eq!(config.embedding_model, "nomic-embed-text");
        assert_eq!(config.student_id, "alice");
        assert_eq!(config.leaderboard_size, 10);
        assert_eq!(config.catalog_dir, PathBuf::from("my-assignments"));
        assert!(matches!(
            config.provider(None).unwrap().1,
            ProviderConfig::Ollama { .. }
        ));
        assert!(matches!(
            config.provider(Some("mock")).unwrap().1,
            ProviderConfig::Mock
        ));
    }

    #[test]
    fn defaults_apply_when_fields_are_omitted() {
        let config = QuizcraftConfig::from_toml("").unwrap();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.embedding_model, "text-embedding-3-small");
        assert_eq!(config.embed_timeout_secs, 30);
        assert_eq!(config.leaderboard_size, 5);
        assert!(config.image_model.is_none());
    }

    #[test]
    fn provider_lookup_reports_the_resolved_name() {
        let config = QuizcraftConfig::from_toml(
            r#"
            default_provider = "mock"

            [providers.mock]
            type = "mock"
            "#,
        )
        .unwrap();

        let requested = String::from("mock");
        let (name, _) = config.provider(Some(&requested)).unwrap();
        assert_eq!(name, "mock");

        let (default_name, _) = config.provider(None).unwrap();
        assert_eq!(default_name, "mock");
    }

    #[test]
    fn unknown_provider_lists_known_names() {
        let config = QuizcraftConfig::from_toml(
            r#"
            [providers.mock]
            type = "mock"
            "#,
        )
        .unwrap();
        let err = config.provider(Some("nope")).unwrap_err();
        assert!(err.to_string().contains("known providers: mock"));
    }

    #[test]
    fn env_refs_resolve_in_api_keys() {
        // Env vars are process-global; use a name no other test touches.
        std::env::remove_var("QUIZCRAFT_OPENAI_KEY");
        std::env::set_var("QUIZCRAFT_TEST_KEY_REF", "sk-resolved");
        let config = QuizcraftConfig::from_toml(
            r#"
            [providers.openai]
            type = "openai"
            api_key = "${QUIZCRAFT_TEST_KEY_REF}"
            "#,
        )
        .unwrap();
        std::env::remove_var("QUIZCRAFT_TEST_KEY_REF");

        match config.provider(Some("openai")).unwrap().1 {
            ProviderConfig::OpenAI { api_key, .. } => assert_eq!(api_key, "sk-resolved"),
            other => panic!("unexpected provider: {other:?}"),
        }
    }

    #[test]
    fn debug_masks_api_keys() {
        let provider = ProviderConfig::OpenAI {
            api_key: "sk-secret".to_string(),
            base_url: None,
            org_id: None,
        };
        let rendered = format!("{provider:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn empty_api_key_is_rejected_at_factory_time() {
        let provider = ProviderConfig::OpenAI {
            api_key: String::new(),
            base_url: None,
            org_id: None,
        };
        let err = match create_embedder(&provider, "text-embedding-3-small") {
            Ok(_) => panic!("empty key must be rejected"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("API key is empty"));
    }

    #[test]
    fn image_generator_absent_for_ollama_and_unset_model() {
        let ollama = ProviderConfig::Ollama { base_url: None };
        assert!(create_image_generator(&ollama, Some("dall-e-3"))
            .unwrap()
            .is_none());

        let mock = ProviderConfig::Mock;
        assert!(create_image_generator(&mock, None).unwrap().is_none());
        assert!(create_image_generator(&mock, Some("any")).unwrap().is_some());
    }
}
