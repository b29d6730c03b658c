use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid API key format: {0}")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Proxy sent an error event: {0}")]
    ErrorEvent(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Malformed response: {0}")]
    Shape(String),

    #[error("Expected a {expected} reply but the transport produced the other mode")]
    ModeMismatch { expected: &'static str },
}

pub type Result<T> = std::result::Result<T, LlmError>;
