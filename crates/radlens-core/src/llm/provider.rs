//! Vision provider trait and request/response types.
//!
//! Defines the interface that all vision model providers implement, plus the
//! factory that creates the right provider from CLI flags and config.

use crate::config::LlmConfig;
use crate::error::AnalysisError;
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

use super::prompt;

/// Base64-encoded image ready to send to a model API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/png", "image/jpeg")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and format string.
    ///
    /// The format is the image format identifier (e.g., "png", "jpeg").
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        let media_type = match format {
            "png" => "image/png",
            "jpeg" | "jpg" => "image/jpeg",
            other => {
                tracing::warn!("Unknown image format '{other}', defaulting to image/png");
                "image/png"
            }
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }
}

/// A request for a radiological review of one image.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// The image under review
    pub image: ImageInput,
    /// Text prompt for the model
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl AnalysisRequest {
    /// Build a structured radiological-review request for an image.
    pub fn radiology_review(image: ImageInput, max_tokens: u32, temperature: f32) -> Self {
        Self {
            image,
            prompt: prompt::RADIOLOGY_REVIEW_PROMPT.to_string(),
            max_tokens,
            temperature,
        }
    }
}

/// The response from a vision model call.
#[derive(Debug, Clone)]
pub struct AnalysisResponse {
    /// Generated markdown findings
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all vision model providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn VisionProvider>` for dynamic dispatch).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name for logging (e.g., "gemini", "ollama").
    fn name(&self) -> &str;

    /// Check whether the provider is configured and reachable.
    async fn is_available(&self) -> bool;

    /// Generate findings for the given request.
    async fn generate(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok()
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the appropriate provider from CLI flags and config.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a vision provider based on provider name, config, and overrides.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("gemini", "ollama")
    /// * `config` - The full LLM config section
    /// * `model_override` - Optional model name that overrides the config default
    /// * `key_override` - Optional API key entered for this session only
    pub fn create(
        provider: &str,
        config: &LlmConfig,
        model_override: Option<&str>,
        key_override: Option<&str>,
    ) -> Result<Box<dyn VisionProvider>, AnalysisError> {
        match provider {
            "gemini" => {
                let cfg = config.gemini.clone().unwrap_or_default();
                let api_key = key_override
                    .map(String::from)
                    .or_else(|| resolve_env_var(&cfg.api_key))
                    .ok_or_else(|| AnalysisError::MissingCredential {
                        provider: "Gemini".to_string(),
                        hint: "Set GOOGLE_API_KEY or enter a key in interactive mode."
                            .to_string(),
                    })?;
                let model = model_override
                    .map(String::from)
                    .unwrap_or(cfg.model.clone());
                Ok(Box::new(super::gemini::GeminiProvider::new(
                    &api_key, &model,
                )))
            }
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                let model = model_override
                    .map(String::from)
                    .unwrap_or(cfg.model.clone());
                Ok(Box::new(super::ollama::OllamaProvider::new(
                    &cfg.endpoint,
                    &model,
                )))
            }
            other => Err(AnalysisError::Llm {
                message: format!("Unknown vision provider: {other}"),
                status_code: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_input_from_bytes_png() {
        let input = ImageInput::from_bytes(&[0x89, 0x50, 0x4E, 0x47], "png");
        assert_eq!(input.media_type, "image/png");
        assert!(!input.data.is_empty());
    }

    #[test]
    fn test_image_input_from_bytes_jpeg() {
        let input = ImageInput::from_bytes(&[0xFF, 0xD8, 0xFF], "jpeg");
        assert_eq!(input.media_type, "image/jpeg");
    }

    #[test]
    fn test_radiology_review_request() {
        let image = ImageInput::from_bytes(&[1, 2, 3], "png");
        let request = AnalysisRequest::radiology_review(image, 2048, 0.2);
        assert!(request.prompt.contains("Image Type & Region"));
        assert_eq!(request.max_tokens, 2048);
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_factory_gemini_without_key_fails() {
        // Point the key at an env var that is definitely unset so the test
        // does not depend on the host environment.
        let config = LlmConfig {
            gemini: Some(crate::config::GeminiConfig {
                api_key: "${RADLENS_TEST_UNSET_KEY_XYZ}".to_string(),
                model: "gemini-2.5-pro".to_string(),
            }),
            ollama: None,
        };
        let err = ProviderFactory::create("gemini", &config, None, None).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingCredential { .. }));
    }

    #[test]
    fn test_factory_gemini_with_session_key() {
        // A session key satisfies the factory even with no config section
        let config = LlmConfig::default();
        let provider =
            ProviderFactory::create("gemini", &config, Some("gemini-2.5-flash"), Some("k"))
                .unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_factory_ollama_needs_no_key() {
        let config = LlmConfig::default();
        let provider = ProviderFactory::create("ollama", &config, None, None).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_factory_rejects_unknown_provider() {
        let config = LlmConfig::default();
        assert!(ProviderFactory::create("palm", &config, None, None).is_err());
    }
}
