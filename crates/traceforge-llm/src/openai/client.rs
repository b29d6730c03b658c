// OpenAI-compatible chat-completions transport

use crate::config::ClientConfig;
use crate::error::{LlmError, Result};
use crate::openai::ChatCompletion;
use crate::streaming::parse_chat_sse_stream;
use crate::traits::{ChatClient, ChatRequest, FragmentStream};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

/// Chat-completions client (HTTP direct, no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create a client from explicit connection settings
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.bearer_token() {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", key))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.endpoint_base().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Build chat completion request payload, forcing the transport mode
    fn build_chat_request(&self, request: &ChatRequest, stream: bool) -> Result<Value> {
        let mut payload = serde_json::to_value(request)?;
        payload["stream"] = Value::Bool(stream);
        Ok(payload)
    }

    async fn post(&self, payload: &Value, accept: &'static str) -> Result<reqwest::Response> {
        let response = self
            .http_client
            .post(self.completions_url())
            .header(ACCEPT, accept)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, "chat completion rejected by proxy");
            return Err(LlmError::Api { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        let payload = self.build_chat_request(request, false)?;
        tracing::debug!(model = %request.model, messages = request.messages.len(), "sending chat completion");

        let response = self.post(&payload, "application/json").await?;
        let body = response.bytes().await?;
        let completion: ChatCompletion = serde_json::from_slice(&body)?;

        Ok(completion)
    }

    async fn chat_stream(&self, request: &ChatRequest) -> Result<FragmentStream> {
        let payload = self.build_chat_request(request, true)?;
        tracing::debug!(model = %request.model, messages = request.messages.len(), "opening chat completion stream");

        let response = self.post(&payload, "text/event-stream").await?;

        Ok(parse_chat_sse_stream(response))
    }
}
