use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while asking the model for text
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error(
        "invalid OpenAI API key\n\nPlease check your OPENAI_API_KEY:\n  1. Verify the key is correct at https://platform.openai.com/api-keys\n  2. Make sure the key hasn't been revoked\n  3. Check that your .env file has the correct format: OPENAI_API_KEY=sk-..."
    )]
    InvalidApiKey,

    #[error(
        "OpenAI API rate limit exceeded\n\nYou've made too many requests. Please:\n  1. Wait a few minutes and try again\n  2. Check your usage at https://platform.openai.com/usage"
    )]
    RateLimited,

    #[error(
        "OpenAI API quota exceeded\n\nYour API key has run out of credits. Check your billing at https://platform.openai.com/account/billing"
    )]
    QuotaExceeded,

    #[error("the diff is too large for the AI model - try staging fewer files")]
    ContextTooLong,

    #[error("OpenAI service is temporarily unavailable - please try again in a few minutes")]
    ServiceUnavailable,

    #[error("request timed out after {0:?} - please check your internet connection and try again")]
    Timeout(Duration),

    #[error("network error - please check your internet connection: {0}")]
    Network(String),

    #[error("OpenAI API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("no response from the model")]
    EmptyResponse,

    #[error("Generator configuration error: {0}")]
    ConfigError(String),
}

/// A single chat-style request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Configuration shared by generator adapters
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model identifier, e.g. `gpt-4o`
    pub model: String,
    /// Base URL of an OpenAI-compatible API
    pub api_base: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl GeneratorConfig {
    pub const DEFAULT_MODEL: &'static str = "gpt-4o";
    pub const DEFAULT_API_BASE: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_key: String) -> Self {
        Self {
            model: Self::DEFAULT_MODEL.to_string(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            api_key,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    pub fn with_api_base(mut self, api_base: String) -> Self {
        self.api_base = api_base;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Something that turns a prompt into free text
#[async_trait]
pub trait Generator: Send + Sync {
    /// Human-readable name (e.g., "OpenAI gpt-4o")
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}
