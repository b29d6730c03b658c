use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::buffer_utils::{parse_sse_stream, SseLineParser};
use crate::error::{LlmError, Result};
use crate::traits::FragmentStream;

/// One `chat.completion.chunk` from a streaming response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatStreamChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub delta: Delta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatStreamChunk {
    /// Fragment carrying a single content delta (or none).
    ///
    /// For `ChatClient` implementors that synthesize streams, such as
    /// in-process stubs standing in for a proxy.
    pub fn delta(content: Option<&str>) -> Self {
        Self {
            id: None,
            model: None,
            choices: vec![StreamChoice {
                index: 0,
                delta: Delta {
                    role: None,
                    content: content.map(str::to_string),
                },
                finish_reason: None,
            }],
        }
    }

    /// Content delta of the first choice, if this step carries text
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.finish_reason.as_deref())
    }
}

/// SSE strategy for the chat-completions endpoint
pub struct ChatChunkParser;

impl SseLineParser for ChatChunkParser {
    type Item = ChatStreamChunk;

    fn parse_data_line(&self, data: &str) -> Result<Option<ChatStreamChunk>> {
        let value: Value = serde_json::from_str(data)?;

        // OpenAI-style error event relayed mid-stream
        if let Some(error) = value.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(LlmError::ErrorEvent(message));
        }

        let chunk: ChatStreamChunk = serde_json::from_value(value)?;
        Ok(Some(chunk))
    }
}

/// Turn an open `text/event-stream` response into a fragment stream
pub fn parse_chat_sse_stream(response: Response) -> FragmentStream {
    parse_sse_stream(response.bytes_stream(), ChatChunkParser)
}
