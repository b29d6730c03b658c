// Connection settings handed to the transport at startup

use serde::{Deserialize, Serialize};

/// Base URL of a locally running TraceForge proxy
pub const DEFAULT_BASE_URL: &str = "http://localhost:8787/v1";

/// Configuration for the chat-completion transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    /// API key forwarded as a bearer token. `None` or empty sends no header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The key, if one was supplied and is not blank
    pub fn bearer_token(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Base URL without a trailing slash
    pub fn endpoint_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
