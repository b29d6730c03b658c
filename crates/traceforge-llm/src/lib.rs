pub mod buffer_utils;
pub mod config;
pub mod consumer;
pub mod error;
pub mod openai;
pub mod streaming;
pub mod traits;
pub mod types;

pub use traits::{ChatClient, ChatOptions, ChatReply, ChatRequest, FragmentStream};

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use consumer::{consume, consume_stream};
pub use error::{LlmError, Result};
pub use openai::{ChatCompletion, OpenAIClient};
pub use streaming::ChatStreamChunk;
pub use types::{Message, Role};
