//! OpenAI-compatible chat completions client.
//!
//! Providers are tried in configured order. A provider without an API key
//! in the environment is never contacted; vision requests also skip
//! providers that have no vision model.

use crate::config::{AiConfig, ProviderConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum AiError {
    #[error("No AI provider is configured")]
    NoProviders,

    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("{provider}: request timed out after {seconds}s")]
    Timeout { provider: String, seconds: u64 },

    #[error("{provider}: cannot connect to {url}")]
    Connect { provider: String, url: String },

    #[error("{provider}: failed to send request: {message}")]
    Request { provider: String, message: String },

    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider}: failed to parse response: {message}")]
    Parse { provider: String, message: String },

    #[error("{provider}: response contained no text")]
    EmptyResponse { provider: String },

    #[error("All AI providers failed. Last error: {0}")]
    Unavailable(String),
}

/// Message content: plain text, or text plus images for vision models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Message in the chat history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    /// User turn carrying a base64 JPEG alongside the prompt.
    pub fn user_with_image(text: impl Into<String>, image_base64: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/jpeg;base64,{}", image_base64),
                    },
                },
            ]),
        }
    }
}

/// One completion call, independent of provider.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: u32,
    /// Route to each provider's vision model.
    pub vision: bool,
}

impl CompletionRequest {
    pub fn new(messages: Vec<ChatMessage>, max_tokens: u32) -> Self {
        Self {
            messages,
            temperature: None,
            max_tokens,
            vision: false,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn vision(mut self) -> Self {
        self.vision = true;
        self
    }
}

/// Text returned by the provider that served a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub provider: String,
    pub model: String,
}

/// Chat completions API request.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
    stream: bool,
}

/// Chat completions API response.
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

/// A provider whose API key was found.
#[derive(Debug, Clone)]
pub struct Provider {
    pub name: String,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub vision_model: Option<String>,
}

impl Provider {
    /// Resolve the API key from the environment; `None` when unset or blank.
    pub fn from_config(config: &ProviderConfig) -> Option<Self> {
        let key = std::env::var(&config.api_key_env).ok()?;
        if key.trim().is_empty() {
            debug!("{} is not set; skipping {}", config.api_key_env, config.name);
            return None;
        }
        Some(Self::with_key(config, key))
    }

    pub fn with_key(config: &ProviderConfig, api_key: impl Into<String>) -> Self {
        Self {
            name: config.name.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            vision_model: config.vision_model.clone(),
        }
    }

    fn model_for(&self, request: &CompletionRequest) -> Option<&str> {
        if request.vision {
            self.vision_model.as_deref()
        } else {
            Some(&self.model)
        }
    }
}

/// Ordered provider chain sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct AiClient {
    http_client: reqwest::Client,
    providers: Vec<Provider>,
    timeout_seconds: u64,
}

impl AiClient {
    /// Build the chain from configuration, keeping only providers with keys.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let providers: Vec<Provider> = config
            .providers
            .iter()
            .filter_map(Provider::from_config)
            .collect();
        Self::new(providers, config.timeout_seconds)
    }

    pub fn new(providers: Vec<Provider>, timeout_seconds: u64) -> Result<Self, AiError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| AiError::Client(e.to_string()))?;

        if providers.is_empty() {
            warn!("No AI provider keys found; AI tools will use built-in fallbacks");
        } else {
            let names: Vec<&str> = providers.iter().map(|p| p.name.as_str()).collect();
            info!("AI providers enabled: {}", names.join(", "));
        }

        Ok(Self {
            http_client,
            providers,
            timeout_seconds,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.providers.is_empty()
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Try each provider in turn; the first success wins.
    pub async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AiError> {
        let mut last_error: Option<AiError> = None;

        for provider in &self.providers {
            let Some(model) = provider.model_for(request) else {
                debug!("{} has no vision model; skipping", provider.name);
                continue;
            };

            match self.send(provider, model, request).await {
                Ok(text) => {
                    debug!("{} ({}) served the request", provider.name, model);
                    return Ok(Completion {
                        text,
                        provider: provider.name.clone(),
                        model: model.to_string(),
                    });
                }
                Err(e) => {
                    warn!("{}", e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(AiError::Unavailable(e.to_string())),
            None => Err(AiError::NoProviders),
        }
    }

    async fn send(
        &self,
        provider: &Provider,
        model: &str,
        request: &CompletionRequest,
    ) -> Result<String, AiError> {
        let url = format!("{}/chat/completions", provider.base_url);

        let body = ChatRequest {
            model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&provider.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout {
                        provider: provider.name.clone(),
                        seconds: self.timeout_seconds,
                    }
                } else if e.is_connect() {
                    AiError::Connect {
                        provider: provider.name.clone(),
                        url: provider.base_url.clone(),
                    }
                } else {
                    AiError::Request {
                        provider: provider.name.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                provider: provider.name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse =
            response.json().await.map_err(|e| AiError::Parse {
                provider: provider.name.clone(),
                message: e.to_string(),
            })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AiError::EmptyResponse {
                provider: provider.name.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider_config(vision: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            name: "Test".to_string(),
            base_url: "http://127.0.0.1:9/v1/".to_string(),
            api_key_env: "BLOGFORGE_TEST_UNSET_KEY".to_string(),
            model: "text-model".to_string(),
            vision_model: vision.map(str::to_string),
        }
    }

    #[test]
    fn test_vision_message_shape() {
        let msg = ChatMessage::user_with_image("Describe", "QUJD");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "Describe"},
                    {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,QUJD"}}
                ]
            })
        );
    }

    #[test]
    fn test_request_omits_missing_temperature() {
        let messages = vec![ChatMessage::user("hi")];
        let body = ChatRequest {
            model: "m",
            messages: &messages,
            temperature: None,
            max_tokens: 10,
            stream: false,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("temperature").is_none());
        assert_eq!(value["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_provider_requires_key() {
        assert!(Provider::from_config(&provider_config(None)).is_none());

        let provider = Provider::with_key(&provider_config(None), "k");
        assert_eq!(provider.base_url, "http://127.0.0.1:9/v1");
    }

    #[test]
    fn test_vision_model_selection() {
        let text_only = Provider::with_key(&provider_config(None), "k");
        let request = CompletionRequest::new(vec![], 10).vision();
        assert_eq!(text_only.model_for(&request), None);

        let vision = Provider::with_key(&provider_config(Some("eye")), "k");
        assert_eq!(vision.model_for(&request), Some("eye"));
        assert_eq!(
            vision.model_for(&CompletionRequest::new(vec![], 10)),
            Some("text-model")
        );
    }

    #[tokio::test]
    async fn test_empty_chain_reports_no_providers() {
        let client = AiClient::new(vec![], 5).unwrap();
        assert!(!client.is_configured());

        let err = client
            .complete(&CompletionRequest::new(vec![ChatMessage::user("x")], 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::NoProviders));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_unavailable() {
        let provider = Provider::with_key(&provider_config(None), "k");
        let client = AiClient::new(vec![provider], 5).unwrap();

        let err = client
            .complete(&CompletionRequest::new(vec![ChatMessage::user("x")], 10))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Unavailable(_)));
    }
}
