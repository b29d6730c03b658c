use crate::error::{LlmError, Result};
use crate::openai::ChatCompletion;
use crate::streaming::ChatStreamChunk;
use crate::types::Message;
use async_trait::async_trait;
use futures::Stream;
use serde::Serialize;
use std::fmt;
use std::pin::Pin;

/// Lazy sequence of fragments backed by an open connection
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<ChatStreamChunk>> + Send>>;

/// Trait for chat-completion transports
///
/// Provides both streaming and non-streaming completions. The mode actually
/// used by [`ChatClient::submit`] is taken from [`ChatRequest::stream`].
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Non-streaming chat completion
    async fn chat(&self, request: &ChatRequest) -> Result<ChatCompletion>;

    /// Streaming chat completion
    async fn chat_stream(&self, request: &ChatRequest) -> Result<FragmentStream>;

    /// Dispatch on the request's streaming flag
    async fn submit(&self, request: &ChatRequest) -> Result<ChatReply> {
        if request.stream {
            Ok(ChatReply::Fragments(self.chat_stream(request).await?))
        } else {
            Ok(ChatReply::Single(self.chat(request).await?))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(flatten)]
    pub options: ChatOptions,
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: ChatOptions::default(),
            stream: false,
        }
    }

    /// Build a fully populated request in one call.
    ///
    /// Sampling parameters are passed through untouched; the proxy decides
    /// whether they are acceptable.
    pub fn build(
        model: impl Into<String>,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
        stream: bool,
    ) -> Self {
        Self::new(model, messages)
            .with_options(ChatOptions::new().temperature(temperature).max_tokens(max_tokens))
            .streaming(stream)
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

/// What the transport hands back, one case per request mode
pub enum ChatReply {
    Single(ChatCompletion),
    Fragments(FragmentStream),
}

impl ChatReply {
    pub fn into_completion(self) -> Result<ChatCompletion> {
        match self {
            Self::Single(completion) => Ok(completion),
            Self::Fragments(_) => Err(LlmError::ModeMismatch {
                expected: "single-result",
            }),
        }
    }

    pub fn into_fragments(self) -> Result<FragmentStream> {
        match self {
            Self::Fragments(fragments) => Ok(fragments),
            Self::Single(_) => Err(LlmError::ModeMismatch {
                expected: "streaming",
            }),
        }
    }
}

impl fmt::Debug for ChatReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(completion) => f.debug_tuple("Single").field(completion).finish(),
            Self::Fragments(_) => f.debug_tuple("Fragments").field(&"<stream>").finish(),
        }
    }
}
