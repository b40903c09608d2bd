//! Chat-completions client.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::request::{ChatMessage, PromptRequest};
use crate::error::{ConfigError, PromptError};
use crate::storage::PromptConfig;

/// Body of one chat-completions call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Anything that can answer a chat request with text.
#[allow(async_fn_in_trait)]
pub trait LlmClient {
    /// Returns the text of the first completion choice.
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String, PromptError>;
}

/// OpenAI-compatible `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

impl OpenAiClient {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        // Url::join drops the last segment unless the base ends with '/'.
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let invalid = |e: url::ParseError| ConfigError::InvalidValue {
            key: "prompt.base_url".into(),
            message: e.to_string(),
        };
        let endpoint = Url::parse(&base)
            .and_then(|u| u.join("chat/completions"))
            .map_err(invalid)?;
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    pub fn from_config(config: &PromptConfig) -> Result<Self, ConfigError> {
        Self::new(&config.base_url)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl LlmClient for OpenAiClient {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String, PromptError> {
        debug!(endpoint = %self.endpoint, model = %request.model, "sending chat completion");
        let resp = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        match status {
            StatusCode::UNAUTHORIZED => return Err(PromptError::Authentication),
            StatusCode::TOO_MANY_REQUESTS => return Err(PromptError::RateLimit),
            s if !s.is_success() => {
                let body = resp.text().await.unwrap_or_default();
                let detail = serde_json::from_str::<ErrorBody>(&body)
                    .map(|b| b.error.message)
                    .unwrap_or(body);
                return Err(PromptError::Generic(format!("HTTP {status}: {detail}")));
            }
            _ => {}
        }

        let parsed: ChatResponse = resp.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| PromptError::Generic("response contained no completion text".into()))
    }
}

/// Validates a request, then asks the client once.
#[derive(Debug, Clone)]
pub struct PromptGenerator<C> {
    client: C,
    config: PromptConfig,
}

impl<C: LlmClient> PromptGenerator<C> {
    pub fn new(client: C, config: PromptConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn chat_request(&self, request: &PromptRequest) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: request.messages(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Missing key or description fails before any network traffic.
    pub async fn generate(&self, request: &PromptRequest, api_key: &str) -> Result<String, PromptError> {
        request.validate(api_key)?;
        let chat = self.chat_request(request);
        match self.client.complete(api_key.trim(), &chat).await {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!(error = %e, "prompt generation failed");
                Err(e)
            }
        }
    }
}

impl PromptGenerator<OpenAiClient> {
    pub fn from_config(config: PromptConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(OpenAiClient::from_config(&config)?, config))
    }
}
