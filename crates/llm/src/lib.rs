//! Chatrelay Completion Gateway
//!
//! Text-in/text-out access to the external generative-AI service:
//! - Google Gemini `generateContent` integration for production
//! - Mock service with programmable outcomes for testing and development
//!
//! Every call sends exactly one request. There is no retry, no streaming and
//! no caller-side timeout.

pub mod gemini;
pub mod mock;

use thiserror::Error;

/// Reply substituted when the provider answers successfully but without text
pub const EMPTY_COMPLETION_PLACEHOLDER: &str =
    "Sorry, I couldn't come up with a response. Please try again.";

/// Default model variant requested from Gemini
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-pro-preview";

/// Default label stored as `sender_ai` on model-authored messages
pub const DEFAULT_SENDER_LABEL: &str = "gemini3";

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM configuration error: {0}")]
    Configuration(String),

    #[error("LLM request error: {0}")]
    Request(String),

    #[error("LLM response error: {0}")]
    Response(String),
}

/// Completion returned by the gateway
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Generated text, never empty
    pub content: String,
    /// Provider model identifier that produced the text
    pub model: String,
}

impl Completion {
    /// Build a completion, substituting the placeholder for missing or blank text
    pub fn from_text(text: Option<String>, model: impl Into<String>) -> Self {
        let content = text
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| EMPTY_COMPLETION_PLACEHOLDER.to_string());
        Self {
            content,
            model: model.into(),
        }
    }
}

/// Completion gateway configuration
#[derive(Clone)]
pub struct LlmConfig {
    /// Provider (gemini, mock)
    pub provider: String,
    /// API key sent with every provider request
    pub api_key: String,
    /// Model identifier used in the request path
    pub model: String,
    /// Override of the provider base URL (tests, proxies)
    pub base_url: Option<String>,
    /// Label recorded as `sender_ai` on replies
    pub sender_label: String,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("sender_label", &self.sender_label)
            .finish()
    }
}

impl LlmConfig {
    /// Create gateway config from environment variables
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
        let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();

        if provider == "gemini" && api_key.is_empty() {
            return Err(LlmError::Configuration(
                "GEMINI_API_KEY is required for gemini provider".to_string(),
            ));
        }

        Ok(Self {
            provider,
            api_key,
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: std::env::var("GEMINI_BASE_URL").ok(),
            sender_label: std::env::var("LLM_SENDER_LABEL")
                .unwrap_or_else(|_| DEFAULT_SENDER_LABEL.to_string()),
        })
    }
}

/// Completion gateway trait for different providers
#[async_trait::async_trait]
pub trait LlmService: Send + Sync {
    /// Send `prompt` as a single stateless request and return the reply text
    async fn complete(&self, prompt: &str) -> Result<Completion, LlmError>;

    /// Model variant label recorded on model-authored messages
    fn sender_label(&self) -> &str;
}

/// Factory for creating LlmService implementations
pub struct LlmServiceFactory;

impl LlmServiceFactory {
    /// Create a gateway based on configuration
    pub fn create(config: LlmConfig) -> Result<Box<dyn LlmService>, LlmError> {
        match config.provider.as_str() {
            "gemini" => {
                tracing::info!(model = %config.model, "Creating Gemini completion gateway");
                if config.api_key.is_empty() {
                    return Err(LlmError::Configuration(
                        "GEMINI_API_KEY is required for gemini provider".to_string(),
                    ));
                }
                Ok(Box::new(gemini::GeminiService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock completion gateway");
                Ok(Box::new(mock::MockLlmService::with_sender_label(
                    config.sender_label,
                )))
            }
            provider => Err(LlmError::Configuration(format!(
                "Unknown LLM provider: {}. Supported providers: gemini, mock",
                provider
            ))),
        }
    }
}
