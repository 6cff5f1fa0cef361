use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CompletionRequest, GenerationError, Generator, GeneratorConfig};

/// Chat-completions client for OpenAI and compatible endpoints
pub struct OpenAiGenerator {
    client: Client,
    config: GeneratorConfig,
    name: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::ConfigError(
                "OPENAI_API_KEY environment variable is not set".into(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::ConfigError(e.to_string()))?;

        Ok(Self {
            name: format!("OpenAI {}", config.model),
            client,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    fn transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.config.timeout)
        } else {
            GenerationError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(
            model = %self.config.model,
            prompt_len = request.user.len(),
            max_tokens = request.max_tokens,
            "Requesting chat completion"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status.as_u16(), &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(GenerationError::EmptyResponse)
    }
}

/// Map an unsuccessful API response onto an actionable error
pub fn classify_api_error(status: u16, body: &str) -> GenerationError {
    if body.contains("insufficient_quota") {
        GenerationError::QuotaExceeded
    } else if body.contains("context_length_exceeded") {
        GenerationError::ContextTooLong
    } else if status == 401 || body.contains("invalid_api_key") {
        GenerationError::InvalidApiKey
    } else if status == 429 {
        GenerationError::RateLimited
    } else if matches!(status, 500 | 502 | 503) {
        GenerationError::ServiceUnavailable
    } else {
        GenerationError::Api {
            status,
            body: body.to_string(),
        }
    }
}
