use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Inference API key is not configured")]
    MissingApiKey,

    #[error("Inference request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Inference rate limit exceeded: {message}")]
    RateLimited { message: String },

    #[error("Inference API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),
}

/// A hosted chat-completion model that turns one prompt into one completion.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError>;

    fn is_configured(&self) -> bool {
        true
    }
}

// Request types for the OpenAI-compatible chat completion endpoint
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Groq chat completions, requested in JSON output mode.
pub struct GroqClient {
    client: Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
    temperature: f32,
}

impl GroqClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.groq_api_key.clone(),
            api_base: config.groq_api_base.trim_end_matches('/').to_string(),
            model: config.groq_model.clone(),
            temperature: config.temperature,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn complete(&self, prompt: &str) -> Result<String, InferenceError> {
        let api_key = self.api_key.as_deref().ok_or(InferenceError::MissingApiKey)?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            warn!(status = %status, error_message = %message, "Inference API returned an error");

            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                InferenceError::RateLimited { message }
            } else {
                InferenceError::Api {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let body = response.text().await?;
        let envelope: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| InferenceError::MalformedResponse("no completion content".to_string()))
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
